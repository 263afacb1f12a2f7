/// Constants used throughout the taskwright codebase
// Configuration file looked up in the project root
pub const CONFIG_FILENAME: &str = "taskwright.json";

// Environment variable names
pub const NODE_ENV_VAR: &str = "NODE_ENV";
pub const TASKWRIGHT_LOG_VAR: &str = "TASKWRIGHT_LOG";
pub const FAILED_TASK_VAR: &str = "TASKWRIGHT_FAILED_TASK";
pub const FAILURE_MESSAGE_VAR: &str = "TASKWRIGHT_ERROR";

// Conventional project layout
pub const SERVER_DIR: &str = "server";
pub const DEV_DIR: &str = "dev";
pub const DIST_DIR: &str = "dist";

// Production config copied by `config-prod`
pub const PROD_CONFIG_SOURCE: &str = "server/config-prod.json";
pub const PROD_CONFIG_FILENAME: &str = "config.json";
