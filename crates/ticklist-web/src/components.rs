mod task_form;
mod task_row;
mod task_section;
mod toast_container;

pub use task_form::TaskForm;
pub use task_row::TaskRow;
pub use task_section::TaskSection;
pub use toast_container::ToastContainer;
