use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriveError {
    #[error("route has {0} coordinate(s); at least 2 are needed to drive")]
    DegenerateRoute(usize),

    #[error("drive task failed: {0}")]
    Join(String),
}

pub type DriveResult<T> = Result<T, DriveError>;
