use anyhow::Result;
use futures::StreamExt;
use gemma_stub::{
    utils::{setup_logging, LogConfig},
    ChatMessage, Gemma3nService, ModelConfigOverrides, ModelSize,
};
use std::io::Write;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    setup_logging(LogConfig {
        level: tracing::Level::INFO,
        ..Default::default()
    })
    .map_err(anyhow::Error::msg)?;

    let service = Gemma3nService::new(ModelConfigOverrides {
        model_size: Some(ModelSize::Small),
        ..Default::default()
    })?;

    info!("Loading model...");
    service.initialize().await?;
    print!("{}", service.info());

    let mut history = vec![ChatMessage::system("You are a helpful on-device assistant.")];

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input == "exit" {
            break;
        }

        if let Some(prompt) = input.strip_prefix("/stream ") {
            let mut stream = service.generate_stream(prompt, None);
            let mut printed = 0;
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                print!("{}", &chunk[printed..]);
                std::io::stdout().flush()?;
                printed = chunk.len();
            }
            println!();
            continue;
        }

        history.push(ChatMessage::user(input));
        let reply = service.chat(&history, None).await?;
        println!("{}", reply);
        history.push(ChatMessage::assistant(reply));
    }

    let metrics = service.metrics().await;
    info!(
        generations = metrics.total_generations,
        average_latency_ms = metrics.average_latency.as_millis() as u64,
        "Shutting down"
    );
    service.unload().await?;
    Ok(())
}
