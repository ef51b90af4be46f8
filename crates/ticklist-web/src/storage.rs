use anyhow::anyhow;
use ticklist_store::Storage;

/// [`Storage`] over `window.localStorage`, looked up on every call.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub struct LocalStorage;

fn local_storage()
-> anyhow::Result<web_sys::Storage> {
  let window = web_sys::window()
    .ok_or_else(|| {
      anyhow!("no browser window")
    })?;
  window
    .local_storage()
    .map_err(|err| {
      anyhow!(
        "localStorage unavailable: \
         {err:?}"
      )
    })?
    .ok_or_else(|| {
      anyhow!("localStorage disabled")
    })
}

impl Storage for LocalStorage {
  fn get_item(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>> {
    local_storage()?
      .get_item(key)
      .map_err(|err| {
        anyhow!(
          "failed reading \
           localStorage[{key}]: \
           {err:?}"
        )
      })
  }

  fn set_item(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    local_storage()?
      .set_item(key, value)
      .map_err(|err| {
        anyhow!(
          "failed writing \
           localStorage[{key}]: \
           {err:?}"
        )
      })
  }
}
