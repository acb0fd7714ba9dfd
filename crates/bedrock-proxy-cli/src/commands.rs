use anyhow::Context;
use bedrock_proxy_ox::{ChatRequest, ChatResponse, ContentPart, Model, ProxyRequestError};
use std::io::Write;

use crate::{backend::Backend, cli::ChatArgs};

/// 1x1 JPEG used by the vision step of the walkthrough
const SAMPLE_JPEG_BASE64: &str = "/9j/4AAQSkZJRgABAQAAAQABAAD/2wBDAAYEBQYFBAYGBQYHBwYIChAKCgkJChQODwwQFxQYGBcUFhYaHSUfGhsjHBYWICwgIyYnKSopGR8tMC0oMCUoKSj/2wBDAQcHBwoIChMKChMoGhYaKCgoKCgoKCgoKCgoKCgoKCgoKCgoKCgoKCgoKCgoKCgoKCgoKCgoKCgoKCgoKCgoKCj/wAARCAABAAEDASIAAhEBAxEB/8QAFQABAQAAAAAAAAAAAAAAAAAAAAv/xAAUEAEAAAAAAAAAAAAAAAAAAAAA/8QAFQEBAQAAAAAAAAAAAAAAAAAAAAX/xAAUEQEAAAAAAAAAAAAAAAAAAAAA/9oADAMBAAIRAxEAPwCdABmX/9k=";

pub fn list_models(backend: &dyn Backend, out: &mut impl Write) -> anyhow::Result<()> {
    let models = backend.list_models()?;
    writeln!(out, "Available models: {}", serde_json::to_string_pretty(&*models)?)?;
    Ok(())
}

pub fn chat(backend: &dyn Backend, args: &ChatArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let mut builder = ChatRequest::builder()
        .model(args.model.as_str())
        .temperature(args.temperature)
        .max_tokens(args.max_tokens)
        .stream(args.stream);

    if let Some(ref system) = args.system {
        builder = builder.system_message(system.as_str());
    }

    builder = match args.image {
        Some(ref path) => {
            let data = std::fs::read(path)
                .with_context(|| format!("failed to read image {}", path.display()))?;
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            builder.user_parts(vec![
                ContentPart::text(args.prompt.as_str()),
                ContentPart::image_base64(mime.essence_str(), data),
            ])
        }
        None => builder.user_message(args.prompt.as_str()),
    };

    let response = backend.chat_completion(&builder.build())?;
    print_response(&response, out)?;
    Ok(())
}

/// The guided tour: models, plain chat, system prompt, multi-turn, vision
pub fn demo(backend: &dyn Backend, out: &mut impl Write) -> anyhow::Result<()> {
    writeln!(out, "Bedrock OpenAI Proxy client examples ({} mode)\n", backend.mode())?;

    writeln!(out, "Listing available models...")?;
    list_models(backend, out)?;
    writeln!(out)?;

    writeln!(out, "OpenAI-compatible chat completion...")?;
    let request = ChatRequest::builder()
        .model(Model::Gpt3_5Turbo)
        .user_message("Hello! Can you tell me about AWS Bedrock?")
        .temperature(0.7)
        .max_tokens(500)
        .build();
    print_response(&backend.chat_completion(&request)?, out)?;

    writeln!(out, "Chat with system message...")?;
    let request = ChatRequest::builder()
        .model(Model::Gpt4)
        .system_message("You are a helpful AWS expert assistant.")
        .user_message("What are the benefits of using AWS Bedrock?")
        .temperature(0.5)
        .max_tokens(300)
        .build();
    print_response(&backend.chat_completion(&request)?, out)?;

    writeln!(out, "Multi-turn conversation...")?;
    let request = ChatRequest::builder()
        .model(Model::Gpt4)
        .system_message("You are a helpful AWS expert.")
        .user_message("What is AWS Bedrock?")
        .assistant_message(
            "AWS Bedrock is a fully managed service that offers foundation models from leading AI companies through a single API.",
        )
        .user_message("What are its main benefits?")
        .temperature(0.5)
        .max_tokens(300)
        .build();
    print_response(&backend.chat_completion(&request)?, out)?;

    writeln!(out, "Vision model example...")?;
    let request = ChatRequest::builder()
        .model(Model::Claude3Sonnet)
        .user_parts(vec![
            ContentPart::text("What do you see in this image?"),
            ContentPart::image_url(format!("data:image/jpeg;base64,{SAMPLE_JPEG_BASE64}")),
        ])
        .temperature(0.5)
        .max_tokens(300)
        .build();
    // A proxy without a vision-capable mapping is not fatal for the tour
    match backend.chat_completion(&request) {
        Ok(response) => print_response(&response, out)?,
        Err(e) => writeln!(out, "Vision model not available or error: {e}\n")?,
    }

    Ok(())
}

fn print_response(response: &ChatResponse, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "Response: {}", response.content().unwrap_or("<no content>"))?;
    if let Some(usage) = response.usage() {
        writeln!(out, "Usage: {usage}")?;
    }
    writeln!(out)
}

/// Presentation policy: HTTP failures show status and body, the rest just the message
pub fn report_error(err: &anyhow::Error, out: &mut impl Write) -> std::io::Result<()> {
    match err.downcast_ref::<ProxyRequestError>() {
        Some(ProxyRequestError::HttpStatus { status, body }) => {
            writeln!(out, "HTTP Error: {status}")?;
            writeln!(out, "Response: {body}")
        }
        _ => writeln!(out, "Error: {err:#}"),
    }
}
