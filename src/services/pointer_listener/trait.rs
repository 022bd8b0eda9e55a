use crate::config::Config;
use crate::error::Result;
use crate::services::InputState;
use std::sync::Arc;

/// Trait for pointer listeners that can run in different modes
#[async_trait::async_trait]
pub trait PointerListenerTrait {
    /// Run the pointer listener
    async fn run(self: Box<Self>) -> Result<()>;
}

/// Factory function to create an appropriate pointer listener based on the dry_run flag
pub fn create_pointer_listener(
    config: Arc<Config>,
    input_state: Arc<InputState>,
    dry_run: bool,
) -> Result<Box<dyn PointerListenerTrait + Send>> {
    if dry_run {
        Ok(Box::new(super::dry_run::DryRunPointerListener::new(
            input_state,
        )))
    } else {
        Ok(Box::new(super::pointer_listener::RealPointerListener::new(
            config,
            input_state,
        )?))
    }
}
