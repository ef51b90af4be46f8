use ticklist_store::Task;
use ticklist_store::view::Section;
use yew::{
  Callback,
  Event,
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct TaskRowProps {
  pub task:      Task,
  pub section:   Section,
  pub on_toggle: Callback<u64>,
  pub on_edit:   Callback<u64>,
  pub on_delete: Callback<u64>
}

#[function_component(TaskRow)]
pub fn task_row(
  props: &TaskRowProps
) -> Html {
  let id = props.task.id;
  let on_toggle = props.on_toggle.clone();
  let on_edit = props.on_edit.clone();
  let on_delete = props.on_delete.clone();
  let title_class =
    if props.task.is_completed {
      "line-through"
    } else {
      ""
    };

  html! {
      <li class="task-row">
          <div>
              <input
                  type="checkbox"
                  checked={props.task.is_completed}
                  onchange={move |_: Event| on_toggle.emit(id)}
                  aria-label={props.section.checkbox_label()}
              />
              <span class={title_class}>{ &props.task.title }</span>
              <span class="due">{ format!("({})", props.task.due_date) }</span>
          </div>
          <div>
              <button class="btn-edit" onclick={move |_| on_edit.emit(id)}>
                  { "Edit" }
              </button>
              <button class="btn-delete" onclick={move |_| on_delete.emit(id)}>
                  { "Delete" }
              </button>
          </div>
      </li>
  }
}
