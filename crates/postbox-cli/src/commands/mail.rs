use anyhow::{Context, Result};
use clap::Args;
use postbox_core::mail::{ComposeDraft, DEFAULT_FOLDER, DEFAULT_PAGE_SIZE, EmailMessage};
use std::path::PathBuf;

use super::Runtime;

#[derive(Args)]
pub struct FolderArgs {
    #[arg(long, default_value = DEFAULT_FOLDER)]
    folder: String,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    limit: u32,
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    folder: FolderArgs,
    #[arg(long, default_value_t = 0)]
    skip: u32,
}

#[derive(Args)]
pub struct SendArgs {
    /// Recipients, comma or semicolon separated
    #[arg(long)]
    to: String,
    #[arg(long, default_value = "")]
    cc: String,
    #[arg(long, default_value = "")]
    subject: String,
    #[arg(long, default_value = "")]
    body: String,
    /// Files to attach
    #[arg(long = "attach")]
    attachments: Vec<PathBuf>,
}

pub async fn health(runtime: &Runtime) -> Result<()> {
    let message = runtime.api.health().await?;
    println!("{} ({})", message, runtime.config.api_base());
    Ok(())
}

pub async fn refresh(runtime: &Runtime, args: FolderArgs) -> Result<()> {
    let emails = runtime.mailbox().refresh(&args.folder, args.limit).await?;
    print_list(&emails);
    Ok(())
}

pub async fn list(runtime: &Runtime, args: ListArgs) -> Result<()> {
    let emails = runtime
        .mailbox()
        .list(&args.folder.folder, args.folder.limit, args.skip)
        .await?;
    print_list(&emails);
    Ok(())
}

pub async fn search(runtime: &Runtime, query: &str, limit: u32) -> Result<()> {
    let emails = runtime.mailbox().search(query, limit).await?;
    print_list(&emails);
    Ok(())
}

pub async fn open(runtime: &Runtime, id: &str) -> Result<()> {
    let email = runtime.mailbox().open(id).await?;
    println!("From:    {}", email.from_address);
    println!("To:      {}", email.to_address.join(", "));
    if !email.cc_address.is_empty() {
        println!("Cc:      {}", email.cc_address.join(", "));
    }
    println!("Date:    {}", email.date.format("%Y-%m-%d %H:%M"));
    println!("Subject: {}", email.subject);
    for attachment in &email.attachments {
        println!(
            "Attach:  {} ({}, {} bytes)",
            attachment.filename, attachment.content_type, attachment.size
        );
    }
    println!();
    println!("{}", email.body());
    Ok(())
}

pub async fn set_read(runtime: &Runtime, id: &str, is_read: bool) -> Result<()> {
    runtime.mailbox().set_read(id, is_read).await?;
    println!("Marked {id} as {}", if is_read { "read" } else { "unread" });
    Ok(())
}

pub async fn delete(runtime: &Runtime, id: &str) -> Result<()> {
    runtime.mailbox().delete(id).await?;
    println!("Deleted {id}");
    Ok(())
}

pub async fn folders(runtime: &Runtime) -> Result<()> {
    for folder in runtime.mailbox().folders().await? {
        println!("{:<24} {:>6}", folder.name, folder.message_count);
    }
    Ok(())
}

pub async fn send(runtime: &Runtime, args: SendArgs) -> Result<()> {
    let mut draft = ComposeDraft::new(args.to, args.subject, args.body).with_cc(args.cc);
    for path in &args.attachments {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read attachment {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());
        let content_type = mime_guess::from_path(path).first_or_octet_stream();
        draft = draft.with_attachment(filename, content_type.essence_str(), &bytes);
    }

    runtime.mailbox().send(draft).await?;
    println!("Sent");
    Ok(())
}

fn print_list(emails: &[EmailMessage]) {
    if emails.is_empty() {
        println!("No messages");
        return;
    }
    for email in emails {
        let flag = if email.is_read { " " } else { "●" };
        let clip = if email.has_attachments() { "📎" } else { " " };
        println!(
            "{flag}{clip} {}  {:<28}  {}",
            email.date.format("%m-%d %H:%M"),
            truncate(&email.from_address, 28),
            email.subject
        );
        println!("     {}  {}", email.id, email.preview(60));
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(max - 1).collect();
        out.push('…');
        out
    }
}
