pub mod bus;
pub mod dispatcher;
pub mod events;


pub use bus::InteractionBus;
pub use dispatcher::CueDispatcher;
pub use events::Interaction;
