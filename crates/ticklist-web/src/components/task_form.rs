use ticklist_store::Form;
use web_sys::HtmlInputElement;
use yew::{
  Callback,
  Html,
  InputEvent,
  Properties,
  TargetCast,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct TaskFormProps {
  pub form:      Form,
  pub on_title:  Callback<String>,
  pub on_due:    Callback<String>,
  pub on_submit: Callback<()>,
  pub on_cancel: Callback<()>
}

/// One input pair for both adding and editing; the button follows the mode.
#[function_component(TaskForm)]
pub fn task_form(
  props: &TaskFormProps
) -> Html {
  let on_title = props.on_title.clone();
  let oninput_title =
    Callback::from(move |e: InputEvent| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      on_title.emit(input.value());
    });

  let on_due = props.on_due.clone();
  let oninput_due =
    Callback::from(move |e: InputEvent| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      on_due.emit(input.value());
    });

  let on_submit = props.on_submit.clone();
  let on_cancel = props.on_cancel.clone();
  let editing = props.form.is_editing();
  let button_class = if editing {
    "btn-update"
  } else {
    "btn-add"
  };

  html! {
      <div class="task-form">
          <input
              type="text"
              value={props.form.title.clone()}
              oninput={oninput_title}
              placeholder="Task title"
              aria-label="Task title"
          />
          <input
              type="date"
              value={props.form.due_date.clone()}
              oninput={oninput_due}
              aria-label="Due date"
          />
          <button class={button_class} onclick={move |_| on_submit.emit(())}>
              { props.form.submit_label() }
          </button>
          {
              if editing {
                  html! {
                      <button class="btn-cancel" onclick={move |_| on_cancel.emit(())}>
                          { "Cancel" }
                      </button>
                  }
              } else {
                  html! {}
              }
          }
      </div>
  }
}
