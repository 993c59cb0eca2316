//! Quick-start walkthrough for the Animoto Rust client.
//!
//! Run with:
//!   ANIMOTO_API_KEY=... ANIMOTO_API_SECRET=... cargo run --example quickstart
//!
//! Set `RUST_LOG=animoto=debug` to see every HTTP exchange.

use std::time::Duration;

use animoto::{
    ClientBuilder, DirectingManifest, ExponentialBackoff, HttpCallbackFormat, JobState,
    RenderingManifest, RenderingParameters, RequestOptions, Resolution, Song, SubmitOptions,
    Visual,
};
use tracing_subscriber::EnvFilter;

fn main() -> animoto::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // -----------------------------------------------------------------------
    // 1. Create a client (reads ANIMOTO_API_KEY / ANIMOTO_API_SECRET)
    // -----------------------------------------------------------------------
    let client = ClientBuilder::new().timeout(Duration::from_secs(30)).build()?;
    println!("Using {} against {}", client.user_agent(), client.host());

    // -----------------------------------------------------------------------
    // 2. Direct and render in one job, with a callback and retries
    // -----------------------------------------------------------------------
    let directing = DirectingManifest::new("Weekend in the hills")
        .visual(Visual::title_card("Weekend", Some("in the hills".into())))
        .visual(Visual::image("https://example.com/photos/1.jpg"))
        .visual(Visual::image("https://example.com/photos/2.jpg"))
        .song(Song::new("https://example.com/audio/theme.mp3"));
    let rendering = RenderingManifest {
        storyboard_url: None,
        rendering_parameters: RenderingParameters {
            resolution: Resolution::R720p,
            ..RenderingParameters::default()
        },
    };
    let options = SubmitOptions::new()
        .http_callback("https://example.com/hooks/animoto", HttpCallbackFormat::Json)
        .request(
            RequestOptions::new().retry_policy(ExponentialBackoff::new(3, Duration::from_secs(1))),
        );

    let mut job = client.direct_and_render_with(directing, rendering, &options)?;
    println!("Submitted job {:?} ({:?})", job.id(), job.state());

    // -----------------------------------------------------------------------
    // 3. Poll by reloading until the job settles
    // -----------------------------------------------------------------------
    while !(job.status.is_completed() || job.status.is_failed()) {
        std::thread::sleep(Duration::from_secs(5));
        client.reload(&mut job)?;
        println!("  state: {:?}", job.state());
    }

    // -----------------------------------------------------------------------
    // 4. Fetch the rendered video
    // -----------------------------------------------------------------------
    if let Some(mut video) = job.video() {
        client.reload(&mut video)?;
        println!("Video file: {:?}", video.file_url);
        println!("Cover image: {:?}", video.cover_image_url);
    } else {
        println!("Job finished without a video");
    }

    Ok(())
}
