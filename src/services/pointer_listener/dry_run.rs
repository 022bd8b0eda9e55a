use crate::error::Result;
use crate::services::InputState;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::info;

use super::r#trait::PointerListenerTrait;

pub struct DryRunPointerListener {
    input_state: Arc<InputState>,
}

impl DryRunPointerListener {
    pub fn new(input_state: Arc<InputState>) -> Self {
        Self { input_state }
    }

    async fn run_impl(self) -> Result<()> {
        info!("Dry-run режим - PointerListener работает в режиме эмуляции");

        let mut pressed = false;
        let mut interval = interval(Duration::from_secs(5));

        loop {
            interval.tick().await;

            pressed = !pressed;
            info!(
                "Dry-run: эмулируем {} левой кнопки",
                if pressed { "нажатие" } else { "отпускание" }
            );
            self.input_state.set_pointer_pressed(pressed);
        }
    }
}

#[async_trait::async_trait]
impl PointerListenerTrait for DryRunPointerListener {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}
