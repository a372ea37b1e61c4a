mod ensemble;
mod time;
mod vertical;

pub use self::{ensemble::*, time::*, vertical::*};
