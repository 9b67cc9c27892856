use thiserror::Error;

#[derive(Error, Debug)]
pub enum FillError {
    #[error("A polygon needs between 3 and 1024 sides, got: {0}")]
    InvalidSides(usize),

    #[error("Tile size must be positive, got: {0}")]
    InvalidTileSize(f64),

    #[error("Invalid display surface: {width}x{height}")]
    InvalidGrid { width: f64, height: f64 },

    #[error("Vertex {index} out of range for a {sides}-sided polygon")]
    VertexOutOfRange { index: usize, sides: usize },

    #[error("Point ({x}, {y}) is not finite")]
    NonFinitePoint { x: f64, y: f64 },

    #[error("Invalid move format: {0}")]
    InvalidMove(String),

    #[error("Invalid color format: {0}")]
    InvalidColor(String),

    #[error("Options --{0} and --{1} are mutually exclusive")]
    ConflictingOptions(String, String),

    #[error("Malformed shape state: {0}")]
    MalformedState(String),

    #[error("Image dimensions too large: {width}x{height} pixels (max: {max})")]
    ImageTooLarge { width: u32, height: u32, max: u32 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, FillError>;
