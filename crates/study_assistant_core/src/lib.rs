pub mod domain;
pub mod parsing;
pub mod ports;
pub mod remote;
pub mod store;

pub use domain::{
    ChatAnswer, ChatMessage, ChatRole, ChatSource, Folder, FolderId, NewChatMessage, NewFolder,
    Note, PdfUpload, Resource, ResourceId, ResourceKind, ResourceSpec, Session, StudyPlan,
    StudyPreferences, StudyWeek, User,
};
pub use ports::{ApiError, ApiResult, ErrorKind, SessionAuthenticator, StudyApi};
pub use store::{DerivedData, StudyStore};
