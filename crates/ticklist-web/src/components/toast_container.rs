use ticklist_store::Toast;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct ToastContainerProps {
  pub toasts:     Vec<Toast>,
  pub on_dismiss: Callback<u64>
}

/// Top-right stack, oldest first; clicking a toast closes it.
#[function_component(ToastContainer)]
pub fn toast_container(
  props: &ToastContainerProps
) -> Html {
  html! {
      <div class="toast-container" role="status">
          {
              for props.toasts.iter().map(|toast| {
                  let id = toast.id;
                  let on_dismiss = props.on_dismiss.clone();
                  let class = format!("toast toast-{}", toast.notice.level.as_str());
                  html! {
                      <div key={id.to_string()} class={class} onclick={move |_| on_dismiss.emit(id)}>
                          { &toast.notice.message }
                      </div>
                  }
              })
          }
      </div>
  }
}
