use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("`{field}` must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: f32,
    },
    #[error("pitch range for {mode} is empty ({min} > {max})")]
    PitchRange {
        mode: &'static str,
        min: f32,
        max: f32,
    },
    #[error("`{field}` must be at most {max} ms, got {value}")]
    DurationTooLong {
        field: &'static str,
        max: u64,
        value: u64,
    },
    #[error("duplicate map point id `{0}`")]
    DuplicateMapPoint(String),
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("invalid scene document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("scene object `{0}` has inverted bounds")]
    InvertedBounds(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid artwork feed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("artwork entry without a name")]
    MissingName,
}

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error("scene already installed")]
    SceneAlreadyInstalled,
    #[error("unknown map point `{0}`")]
    UnknownMapPoint(String),
}
