//! Provider response fixtures and mock server wiring

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Flipgrid category listing path on the mock server
pub const FLIPGRID_CATEGORIES_PATH: &str = "/api/sticker_categories";
/// Teams settings script path on the mock server
pub const TEAMS_SETTINGS_PATH: &str = "/scripts/settings.js";
/// Teams metadata base path on the mock server
pub const TEAMS_METADATA_PATH: &str = "/personal-expressions/v1/metadata";
/// Teams asset base path on the mock server
pub const TEAMS_ASSETS_PATH: &str = "/personal-expressions/v2/assets/emoticons";

/// SVG body served for a Flipgrid sticker
pub fn sticker_svg(name: &str) -> Vec<u8> {
    format!(r#"<svg xmlns="http://www.w3.org/2000/svg"><title>{name}</title></svg>"#).into_bytes()
}

/// PNG-ish body served for a Teams emoticon
pub fn emoticon_png(id: &str) -> Vec<u8> {
    let mut body = b"\x89PNG\r\n\x1a\n".to_vec();
    body.extend_from_slice(id.as_bytes());
    body
}

/// Flipgrid category listing body
pub fn flipgrid_categories(categories: &[(i64, &str, usize)]) -> Value {
    json!({
        "data": categories
            .iter()
            .map(|(id, name, count)| json!({
                "id": id,
                "name": name,
                "sticker_count": count,
                "icon_url": "https://example.invalid/icon.png"
            }))
            .collect::<Vec<_>>()
    })
}

/// One Flipgrid sticker page; stickers are (id, name, position)
pub fn flipgrid_page(
    server: &MockServer,
    stickers: &[(i64, &str, u32)],
    total: usize,
    limit: usize,
) -> Value {
    json!({
        "metadata": {
            "pagination": {
                "total": total,
                "total_pages": total.div_ceil(limit.max(1)),
                "limit": limit
            }
        },
        "data": stickers
            .iter()
            .map(|(id, name, position)| json!({
                "id": id,
                "name": name,
                "position": position,
                "assets": {
                    "svg": format!("{}/assets/{}.svg", server.uri(), name),
                    "pdf": format!("{}/assets/{}.pdf", server.uri(), name)
                }
            }))
            .collect::<Vec<_>>()
    })
}

/// Serve the Flipgrid category listing
pub async fn mount_flipgrid_categories(server: &MockServer, categories: &[(i64, &str, usize)]) {
    Mock::given(method("GET"))
        .and(path(FLIPGRID_CATEGORIES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(flipgrid_categories(categories)))
        .mount(server)
        .await;
}

/// Serve one page of a Flipgrid category
pub async fn mount_flipgrid_page(server: &MockServer, category_id: i64, page: u32, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("{FLIPGRID_CATEGORIES_PATH}/{category_id}/stickers")))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Serve a Flipgrid sticker asset with the given status
pub async fn mount_sticker_asset(server: &MockServer, name: &str, status: u16) {
    let template = if status == 200 {
        ResponseTemplate::new(200).set_body_bytes(sticker_svg(name))
    } else {
        ResponseTemplate::new(status)
    };
    Mock::given(method("GET"))
        .and(path(format!("/assets/{name}.svg")))
        .respond_with(template)
        .mount(server)
        .await;
}

/// Serve the Teams settings script carrying `version`
pub async fn mount_teams_settings(server: &MockServer, version: &str) {
    let script = format!(
        r#"window.__settings = {{"featureFlags":{{}},"emoticonResourceVersion":"{version}","locale":"en-us"}};"#
    );
    Mock::given(method("GET"))
        .and(path(TEAMS_SETTINGS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(script))
        .mount(server)
        .await;
}

/// Serve the Teams metadata document; categories are (id, title, [(emoticon id, etag)])
pub async fn mount_teams_metadata(
    server: &MockServer,
    version: &str,
    categories: &[(&str, &str, Vec<(&str, &str)>)],
) {
    let body = json!({
        "categories": categories
            .iter()
            .map(|(id, title, emoticons)| json!({
                "id": id,
                "title": title,
                "description": format!("{title} emoticons"),
                "emoticons": emoticons
                    .iter()
                    .map(|(eid, etag)| json!({
                        "id": eid,
                        "etag": etag,
                        "description": eid,
                        "shortcuts": [format!("({eid})")],
                        "diverse": false,
                        "animation": { "fps": 24, "framesCount": 48, "firstFrame": 0 }
                    }))
                    .collect::<Vec<_>>()
            }))
            .collect::<Vec<_>>()
    });
    Mock::given(method("GET"))
        .and(path(format!("{TEAMS_METADATA_PATH}/{version}/default.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Serve a Teams emoticon asset with the given status
pub async fn mount_emoticon_asset(server: &MockServer, id: &str, status: u16) {
    let template = if status == 200 {
        ResponseTemplate::new(200).set_body_bytes(emoticon_png(id))
    } else {
        ResponseTemplate::new(status)
    };
    Mock::given(method("GET"))
        .and(path(format!("{TEAMS_ASSETS_PATH}/{id}/default/100_anim_f.png")))
        .respond_with(template)
        .mount(server)
        .await;
}
