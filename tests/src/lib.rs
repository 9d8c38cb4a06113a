//! End-to-end tests driving the engines over real loopback sockets.

pub mod fake_rig;

#[cfg(test)]
mod client {
    mod integration;
}

#[cfg(test)]
mod scan {
    mod integration;
}

#[cfg(test)]
mod sync {
    mod integration;
}
