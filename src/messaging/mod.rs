//! Library change notifications
//!
//! The sound library publishes an [`LibraryEvent`] after every successful
//! mutation. Settings screens subscribe to refresh their selectors.
//!
//! ```text
//! ┌─────────────┐   LibraryEvent   ┌───────────┐   Receiver   ┌──────────────┐
//! │ SoundLibrary│ ───────────────> │ Event Bus │ ───────────> │ Subscribers  │
//! └─────────────┘                  └───────────┘              └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let bus = EventBus::new();
//! let (rx, _id) = bus.subscribe();
//! let library = SoundLibrary::new(store, config).with_event_bus(bus.clone());
//!
//! library.import_asset(AssetCategory::Ambient, Path::new("loop.wav"))?;
//! assert!(matches!(rx.try_recv(), Ok(LibraryEvent::AssetImported { .. })));
//! ```

pub mod bus;
pub mod events;

pub use bus::{EventBus, SubscriberId};
pub use events::LibraryEvent;
