// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use anyhow::Context;

use gheppio_http_handling::{
    processor_thread_count,
    HandlerController,
    ServerLimits,
    ServerSettings,
};

use std::time::{Duration, Instant};

mod example_handlers;

fn main() -> anyhow::Result<()> {
    // Sized once, here, and passed down as plain configuration: the request
    // path never consults the processor count on its own.
    let thread_count = processor_thread_count();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(thread_count)
        .enable_all()
        .build()
        .context("Failed to build the server runtime")?;

    runtime.block_on(begin())
}

async fn begin() -> anyhow::Result<()> {
    let start = Instant::now();

    let mut handler_controller = HandlerController::new();
    example_handlers::register(&mut handler_controller);

    let settings = ServerSettings {
        handler_controller,
        limits: ServerLimits::default(),
        read_headers_timeout: Duration::from_secs(30),
    };

    println!("Loaded after {} ms", start.elapsed().as_millis());

    gheppio_http1::start("127.0.0.1:8080", settings).await
        .context("Server error (HTTP/1.1)")?;

    Ok(())
}
