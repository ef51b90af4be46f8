use ticklist_store::Task;
use ticklist_store::view::Section;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

use super::TaskRow;

#[derive(Properties, PartialEq)]
pub struct TaskSectionProps {
  pub section:   Section,
  pub tasks:     Vec<Task>,
  pub on_toggle: Callback<u64>,
  pub on_edit:   Callback<u64>,
  pub on_delete: Callback<u64>
}

#[function_component(TaskSection)]
pub fn task_section(
  props: &TaskSectionProps
) -> Html {
  let class = match props.section {
    | Section::Incomplete => {
      "section-incomplete"
    }
    | Section::Completed => {
      "section-completed"
    }
  };

  html! {
      <div class={class}>
          <h2>{ props.section.heading() }</h2>
          {
              if props.tasks.is_empty() {
                  html! { <div>{ props.section.empty_placeholder() }</div> }
              } else {
                  html! {}
              }
          }
          <ul class="task-list">
              {
                  for props.tasks.iter().cloned().map(|task| html! {
                      <TaskRow
                          key={task.id.to_string()}
                          task={task.clone()}
                          section={props.section}
                          on_toggle={props.on_toggle.clone()}
                          on_edit={props.on_edit.clone()}
                          on_delete={props.on_delete.clone()}
                      />
                  })
              }
          </ul>
      </div>
  }
}
