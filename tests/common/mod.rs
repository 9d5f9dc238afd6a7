#![allow(dead_code, unused_imports)]

pub use coco_test_utils::builders;
pub use coco_test_utils::{host_env, init_tracing, with_timeout, RecordingSink, SinkEvent};
