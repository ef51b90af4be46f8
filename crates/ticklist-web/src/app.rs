use std::rc::Rc;

use chrono::Utc;
use gloo::timers::callback::Timeout;
use ticklist_store::store::{
  DEFAULT_STORAGE_KEY,
  notice_for
};
use ticklist_store::view::{
  Section,
  partition
};
use ticklist_store::{
  Outcome,
  TaskId,
  TaskStore,
  ToastQueue
};
use yew::{
  Callback,
  Html,
  Reducible,
  function_component,
  html,
  use_effect_with,
  use_reducer
};

use crate::components::{
  TaskForm,
  TaskSection,
  ToastContainer
};
use crate::storage::LocalStorage;

#[derive(Clone, PartialEq)]
pub struct BoardState {
  pub store:  TaskStore<LocalStorage>,
  pub toasts: ToastQueue
}

pub enum Action {
  SetTitle(String),
  SetDueDate(String),
  Submit,
  StartEdit(TaskId),
  CancelEdit,
  Delete(TaskId),
  Toggle(TaskId),
  DismissToast(u64),
  PruneToasts
}

impl BoardState {
  fn load() -> Self {
    let store = match TaskStore::load(
      LocalStorage,
      DEFAULT_STORAGE_KEY
    ) {
      | Ok(store) => store,
      | Err(error) => {
        tracing::error!(
          error = %format!("{error:#}"),
          "failed loading tasks from \
           local storage"
        );
        TaskStore::new(
          LocalStorage,
          DEFAULT_STORAGE_KEY
        )
      }
    };

    Self {
      store,
      toasts: ToastQueue::default()
    }
  }
}

impl Reducible for BoardState {
  type Action = Action;

  fn reduce(
    self: Rc<Self>,
    action: Action
  ) -> Rc<Self> {
    let mut next = (*self).clone();
    let now = Utc::now();

    let result = match action {
      | Action::SetTitle(title) => {
        next.store.set_title(title);
        return Rc::new(next);
      }
      | Action::SetDueDate(due) => {
        next.store.set_due_date(due);
        return Rc::new(next);
      }
      | Action::DismissToast(id) => {
        next.toasts.dismiss(id);
        return Rc::new(next);
      }
      | Action::PruneToasts => {
        next.toasts.prune(now);
        return Rc::new(next);
      }
      | Action::Submit => {
        next.store.submit(now)
      }
      | Action::StartEdit(id) => {
        Ok(next.store.start_edit(id))
      }
      | Action::CancelEdit => {
        Ok(next.store.cancel_edit())
      }
      | Action::Delete(id) => {
        next.store.delete_task(id)
      }
      | Action::Toggle(id) => {
        next.store.toggle_complete(id)
      }
    };

    match &result {
      | Ok(Outcome::NotFound(id)) => {
        tracing::warn!(
          id,
          "ignored action on stale \
           task id"
        );
      }
      | Ok(_) => {}
      | Err(error) => {
        tracing::error!(
          error = %format!("{error:#}"),
          "failed saving tasks to \
           local storage"
        );
      }
    }
    if let Some(notice) =
      notice_for(&result)
    {
      next.toasts.push(notice, now);
    }

    Rc::new(next)
  }
}

#[function_component(App)]
pub fn app() -> Html {
  let state =
    use_reducer(BoardState::load);

  {
    let dispatcher = state.dispatcher();
    let next_expiry =
      state.toasts.next_expiry();
    use_effect_with(
      next_expiry,
      move |next_expiry| {
        let timeout =
          next_expiry.map(|at| {
            let wait = (at - Utc::now())
              .num_milliseconds()
              .max(0);
            let wait = u32::try_from(wait)
              .unwrap_or(u32::MAX);
            Timeout::new(wait, move || {
              dispatcher.dispatch(
                Action::PruneToasts
              );
            })
          });
        move || drop(timeout)
      }
    );
  }

  let on_title = {
    let state = state.clone();
    Callback::from(
      move |title: String| {
        state.dispatch(
          Action::SetTitle(title)
        )
      }
    )
  };
  let on_due = {
    let state = state.clone();
    Callback::from(move |due: String| {
      state
        .dispatch(Action::SetDueDate(due))
    })
  };
  let on_submit = {
    let state = state.clone();
    Callback::from(move |_: ()| {
      state.dispatch(Action::Submit)
    })
  };
  let on_cancel = {
    let state = state.clone();
    Callback::from(move |_: ()| {
      state.dispatch(Action::CancelEdit)
    })
  };
  let on_edit = {
    let state = state.clone();
    Callback::from(move |id: TaskId| {
      state.dispatch(Action::StartEdit(id))
    })
  };
  let on_delete = {
    let state = state.clone();
    Callback::from(move |id: TaskId| {
      state.dispatch(Action::Delete(id))
    })
  };
  let on_toggle = {
    let state = state.clone();
    Callback::from(move |id: TaskId| {
      state.dispatch(Action::Toggle(id))
    })
  };
  let on_dismiss = {
    let state = state.clone();
    Callback::from(move |id: u64| {
      state
        .dispatch(Action::DismissToast(id))
    })
  };

  let (incomplete, completed) =
    partition(state.store.tasks());
  let incomplete =
    incomplete.into_iter().cloned().collect::<Vec<_>>();
  let completed =
    completed.into_iter().cloned().collect::<Vec<_>>();
  let toasts = state
    .toasts
    .visible(Utc::now())
    .cloned()
    .collect::<Vec<_>>();

  html! {
      <div class="task-manager">
          <h1>{ "Manage Your Task Today" }</h1>
          <TaskForm
              form={state.store.form().clone()}
              on_title={on_title}
              on_due={on_due}
              on_submit={on_submit}
              on_cancel={on_cancel}
          />
          <TaskSection
              section={Section::Incomplete}
              tasks={incomplete}
              on_toggle={on_toggle.clone()}
              on_edit={on_edit.clone()}
              on_delete={on_delete.clone()}
          />
          <TaskSection
              section={Section::Completed}
              tasks={completed}
              on_toggle={on_toggle}
              on_edit={on_edit}
              on_delete={on_delete}
          />
          <ToastContainer toasts={toasts} on_dismiss={on_dismiss} />
      </div>
  }
}
