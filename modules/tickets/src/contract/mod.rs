pub mod client;
pub mod error;
pub mod model;

pub use error::TicketsError;
pub use model::{
    NewNote, NewTicket, NewUser, Note, Priority, Status, Ticket, TicketPatch, TicketStats,
    TimelineEntry, User,
};
