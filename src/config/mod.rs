mod app_config;

pub use app_config::{
    PartitionConfig, CONFIG_ENV_VAR, DEFAULT_ANNOTATION_FILE_NAME, DEFAULT_SEED,
};
