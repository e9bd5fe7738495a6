mod common;
mod phase;
mod store;
