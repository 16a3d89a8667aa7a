use labyrinth_maze::MazeError;

use crate::session::SessionState;

/// Errors from building or driving a session.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    #[error(transparent)]
    Maze(#[from] MazeError),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("cannot {action} a session that is {from:?}")]
    InvalidTransition {
        from: SessionState,
        action: &'static str,
    },
}
