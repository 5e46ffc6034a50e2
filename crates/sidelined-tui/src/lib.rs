// Library root: exposes the dashboard so the binary and tests can reach it.

pub mod tui;
