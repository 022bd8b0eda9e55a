mod dry_run;
mod pointer_listener;
mod r#trait;

pub use self::r#trait::{create_pointer_listener, PointerListenerTrait};
