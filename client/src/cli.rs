//! Command-line interface.
//!
//! - `login`: Exchange credentials for a session
//! - `logout`: Forget the stored session
//! - `whoami`: Show the session's identity, role and permissions
//! - `check`: Evaluate the page guard of a dashboard route
//! - `comments`: Browse a comment thread
//! - `post-comment`: Post a comment or reply

use anyhow::{anyhow, bail, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use futures::future::try_join_all;

use nw_common::{Comment, ContentType, SortOrder};

use crate::access::{GuardDecision, PageGuard};
use crate::comments::{list_replies, ThreadNode};
use crate::config::Config;
use crate::error::ApiError;
use crate::format::time_ago;
use crate::navigation;
use crate::notify::Notifications;
use crate::Dashboard;

/// Neswara admin dashboard
#[derive(Parser, Debug)]
#[command(name = "nw-dashboard", version, about, long_about = None, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Log in and store the session token
    Login(LoginArgs),

    /// Forget the stored session
    Logout,

    /// Show the current identity, role, permissions and sidebar
    Whoami,

    /// Evaluate the page guard of a route (e.g. /news/view/slug/edit)
    Check {
        route: String,
    },

    /// List the comments of a news article or video
    Comments(CommentsArgs),

    /// Post a comment, or a reply with --parent
    #[command(name = "post-comment")]
    PostComment(PostCommentArgs),
}

#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    #[arg(long, env = "NESWARA_EMAIL")]
    pub email: String,

    #[arg(long, env = "NESWARA_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Use the administrator login endpoint
    #[arg(long)]
    pub admin: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CommentsArgs {
    /// news or video
    pub content_type: ContentType,

    pub content_id: i64,

    /// asc or desc
    #[arg(long, default_value = "desc")]
    pub order: SortOrder,

    /// Number of pages to load
    #[arg(long, default_value_t = 1)]
    pub pages: u32,

    /// Expand the replies of every listed comment
    #[arg(long)]
    pub replies: bool,
}

#[derive(Args, Debug, Clone)]
pub struct PostCommentArgs {
    pub content_type: ContentType,

    pub content_id: i64,

    pub body: String,

    /// Reply to this top-level comment
    #[arg(long)]
    pub parent: Option<i64>,
}

/// Turn an API failure into a notice and a command error.
fn report(notes: &mut Notifications, error: &ApiError) -> anyhow::Error {
    notes.notify_failure(error);
    let message = notes
        .drain()
        .into_iter()
        .map(|n| n.message)
        .collect::<Vec<_>>()
        .join("; ");
    anyhow!(message)
}

fn print_comment(comment: &Comment, indent: &str) {
    let edited = if comment.is_edited() { " (edited)" } else { "" };
    println!(
        "{indent}#{} {} · {}{edited}",
        comment.id,
        comment.author_email,
        time_ago(comment.created_at, Utc::now())
    );
    for line in comment.body.lines() {
        println!("{indent}  {line}");
    }
}

/// Execute a parsed command line.
pub async fn run(cli: Cli, config: Config) -> Result<()> {
    let dashboard = Dashboard::new(config)?;
    let mut notes = Notifications::new();

    match cli.command {
        Commands::Login(args) => {
            let identity = dashboard
                .login(&args.email, &args.password, args.admin)
                .await
                .map_err(|e| report(&mut notes, &e))?;
            println!(
                "Logged in as {} (role {})",
                identity.email.as_deref().unwrap_or("unknown"),
                identity.role_id
            );
        }
        Commands::Logout => {
            dashboard.logout().await;
            println!("Logged out");
        }
        Commands::Whoami => {
            restore(&dashboard, &mut notes).await;
            let snapshot = dashboard.snapshot();
            match &snapshot.identity {
                Some(identity) => println!(
                    "User {} <{}> (role {})",
                    identity.id,
                    identity.email.as_deref().unwrap_or("unknown"),
                    snapshot.role_id
                ),
                None => println!("Guest (role {})", snapshot.role_id),
            }
            let names = snapshot.permissions.names();
            if snapshot.permissions.is_loaded() {
                println!("Permissions ({}): {}", names.len(), names.join(", "));
            } else {
                println!("Permissions: not loaded");
            }
            for item in navigation::visible_items(&snapshot) {
                println!("  {} -> {}", item.label, item.href);
            }
        }
        Commands::Check { route } => {
            if navigation::is_public(&route) {
                println!("allow (public route)");
                return Ok(());
            }
            let guard = navigation::guard_for(&route)
                .ok_or_else(|| anyhow!("unknown route `{route}`"))?;
            restore(&dashboard, &mut notes).await;
            let reader = dashboard.reader();
            let decision = match PageGuard::dashboard().check(&reader) {
                GuardDecision::Allow => guard.check(&reader),
                other => other,
            };
            match decision {
                GuardDecision::Checking => println!("checking authorization"),
                GuardDecision::Allow => println!("allow"),
                GuardDecision::Redirect(to) => println!("redirect {}", to.path()),
            }
        }
        Commands::Comments(args) => {
            restore(&dashboard, &mut notes).await;
            let mut thread = dashboard
                .comment_thread(args.content_type, args.content_id)
                .with_order(args.order);
            thread
                .load(ThreadNode::TopLevel)
                .await
                .map_err(|e| report(&mut notes, &e))?;
            for _ in 1..args.pages {
                let added = thread
                    .load_more(ThreadNode::TopLevel)
                    .await
                    .map_err(|e| report(&mut notes, &e))?;
                if added == 0 {
                    break;
                }
            }

            let top = thread.items(ThreadNode::TopLevel);
            println!(
                "{} of {} comments on {} {}",
                top.len(),
                thread.total(ThreadNode::TopLevel),
                args.content_type,
                args.content_id
            );
            let replies = if args.replies {
                let api = dashboard.api();
                let page_size = dashboard.config().comment_page_size;
                try_join_all(top.iter().map(|c| {
                    list_replies(api, args.content_type, args.content_id, c.id, page_size)
                }))
                .await
                .map_err(|e| report(&mut notes, &e))?
            } else {
                Vec::new()
            };

            for (i, comment) in top.iter().enumerate() {
                print_comment(comment, "");
                if let Some(page) = replies.get(i) {
                    for reply in &page.items {
                        print_comment(reply, "    ");
                    }
                    let hidden = page.total.saturating_sub(page.items.len() as u64);
                    if hidden > 0 {
                        println!("    ... {hidden} more replies");
                    }
                }
            }
        }
        Commands::PostComment(args) => {
            restore(&dashboard, &mut notes).await;
            let mut thread = dashboard.comment_thread(args.content_type, args.content_id);
            if let Some(parent) = args.parent {
                let found = thread
                    .seek_top_level(parent)
                    .await
                    .map_err(|e| report(&mut notes, &e))?;
                if !found {
                    bail!(
                        "comment {parent} is not a top-level comment of {} {}",
                        args.content_type,
                        args.content_id
                    );
                }
            }
            let message = thread
                .add(args.parent, &args.body)
                .await
                .map_err(|e| report(&mut notes, &e))?;
            notes.success(message.unwrap_or_else(|| "Comment added".to_string()));
            for notice in notes.drain() {
                println!("{}", notice.message);
            }
        }
    }

    Ok(())
}

/// Restore the session; failures only degrade it.
async fn restore(dashboard: &Dashboard, notes: &mut Notifications) {
    if let Err(e) = dashboard.restore().await {
        notes.notify_failure(&e);
        for notice in notes.drain() {
            eprintln!("warning: {}", notice.message);
        }
    }
}
