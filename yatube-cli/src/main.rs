use anyhow::Context;
use clap::Parser;
use yatube_server::application::forms::{GroupForm, SignupForm};
use yatube_server::domain::page::{Page, PageRequest, Paginator};
use yatube_server::domain::post::Post;
use yatube_server::infrastructure::config::AppConfig;
use yatube_server::infrastructure::logging::init_logging;
use yatube_server::infrastructure::security::JwtKeys;
use yatube_server::{AppServices, Repositories};

#[derive(Parser, Debug)]
struct Cli {
    #[clap(long)]
    database_url: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    CreateUser {
        #[clap(long)]
        username: String,
        #[clap(long)]
        password: String,
        #[clap(long)]
        email: Option<String>,
    },
    CreateGroup {
        #[clap(long)]
        title: String,
        #[clap(long)]
        slug: String,
        #[clap(long, default_value = "")]
        description: String,
    },
    Groups,
    Posts {
        #[clap(long, conflicts_with = "author")]
        group: Option<String>,
        #[clap(long)]
        author: Option<String>,
        #[clap(long, default_value_t = 1)]
        page: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_logging();

    let config = AppConfig::from_env()?;
    let database_url = args
        .database_url
        .or(config.database_url.clone())
        .context("DATABASE_URL must be set (or pass --database-url)")?;

    let repos = Repositories::postgres(&database_url).await?;
    let services = AppServices::new(
        repos,
        JwtKeys::new(config.jwt_secret.clone(), config.session_ttl_hours)?,
        Paginator::new(config.posts_per_page),
    );

    match args.command {
        Command::CreateUser {
            username,
            password,
            email,
        } => {
            let form = SignupForm {
                username,
                email,
                password_confirmation: password.clone(),
                password,
            };
            let user = services.auth.register(&form).await?;
            println!("User created: {} ({})", user.username, user.id);
        }
        Command::CreateGroup {
            title,
            slug,
            description,
        } => {
            let group = services
                .groups
                .create_group(&GroupForm {
                    title,
                    slug,
                    description,
                })
                .await?;
            println!("Group created: {} -> /group/{}/", group.title, group.slug);
        }
        Command::Groups => {
            let groups = services.groups.list_groups().await?;
            println!("Groups ({})", groups.len());
            for group in groups {
                println!("- [{}] {} ({})", group.id, group.title, group.slug);
            }
        }
        Command::Posts {
            group,
            author,
            page,
        } => {
            let request = PageRequest::new(page);
            let page = match (group, author) {
                (Some(slug), _) => services.posts.group_posts(&slug, request).await?.1,
                (None, Some(username)) => services.posts.profile(&username, request).await?.1,
                (None, None) => services.posts.index(request).await?,
            };
            print_page(&page);
        }
    }

    Ok(())
}

fn print_page(page: &Page<Post>) {
    println!(
        "Posts: page {} of {} ({} total)",
        page.number,
        page.num_pages(),
        page.total_count
    );
    for post in &page.items {
        let group = post
            .group
            .as_ref()
            .map(|g| format!(" in {}", g.slug))
            .unwrap_or_default();
        println!(
            "- [{}] {} (by {}{}, {})",
            post.id,
            post,
            post.author,
            group,
            post.created_at.format("%Y-%m-%d %H:%M")
        );
    }
}
