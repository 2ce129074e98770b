//! Integration tests for poly-alert

mod config_test;
mod monitor_test;
mod pipeline_test;
