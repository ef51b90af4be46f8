//! Platform-neutral task list: the record model, the storage seam, the
//! store with its shared create/edit form, notifications and the
//! incomplete/completed projection used by every front end.

pub mod notify;
pub mod storage;
pub mod store;
pub mod task;
pub mod view;

pub use notify::{Level, Notice, Toast, ToastQueue};
pub use storage::{MemoryStorage, Storage};
pub use store::{Form, FormMode, Outcome, SaveFailed, TaskStore};
pub use task::{Task, TaskId};
