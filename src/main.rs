use anyhow::Result;
use clap::Parser;
use std::io::Read;
use std::path::Path;
use voxsub::cli::{Cli, Commands};
use voxsub::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Synth {
            text,
            voice,
            rate,
            volume,
            out,
            srt,
        } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
            };

            let Some(stream) =
                voxsub::synthesize(&config, &text, &voice, rate, volume, &out).await
            else {
                anyhow::bail!("synthesis failed, no audio produced");
            };
            println!(
                "audio written to {} ({:.2}s)",
                out.display(),
                stream.duration_secs()
            );

            if let Some(srt_path) = srt {
                // Alignment failure is degraded, not fatal: the audio
                // exists even when the subtitles do not.
                match voxsub::create_subtitle(&stream, &text, &srt_path) {
                    Ok(()) => println!("subtitles written to {}", srt_path.display()),
                    Err(e) => eprintln!("subtitles not written: {}", e),
                }
            }
        }
        Commands::Voices { filter } => {
            let filters: Vec<&str> = filter.iter().map(String::as_str).collect();
            let filter = (!filters.is_empty()).then_some(filters.as_slice());
            for voice in voxsub::list_voices(filter) {
                println!("{}", voice);
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(&Config::default_path())?,
    };
    Ok(config.with_env_overrides())
}
