pub mod command;
pub mod guard;
pub mod render;
pub mod shell;

// Re-export the shell so the binary can drive it directly.
pub use command::Command;
pub use guard::{require_auth, Access};
pub use shell::{Flow, Shell};
