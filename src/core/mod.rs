pub mod gate;
pub mod poll_loop;
