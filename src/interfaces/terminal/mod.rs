//! Line-oriented front-end for the card form.

pub mod command_reader;
pub mod form_writer;
