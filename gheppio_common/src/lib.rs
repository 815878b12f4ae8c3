// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! Platform-specific constants shared by the gheppio crates.

pub mod platform {
    #[cfg(unix)]
    pub mod unix {
        /// The per-process limit on the number of open file descriptors has
        /// been reached.
        pub const ERRNO_EMFILE: i32 = 24;
    }
}
