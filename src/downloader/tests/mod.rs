use super::test_helpers::*;
use super::*;
use crate::config::PaginationConfig;
use crate::error::Error;
use crate::selection::{SelectAll, SelectByTitle};
use std::time::Duration;
