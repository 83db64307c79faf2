use clap::{Args, Parser, Subcommand};
use folio::config::{self, AppConfig, Overrides};
use folio::store::{ContentStore, SqliteStore};
use folio::types::{NewPage, NewPortfolioItem, NewPost};
use folio::{generate, nav, output, slug, templates};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Personal content manager: posts, pages and a portfolio, published as a static site")]
#[command(long_about = "\
Personal content manager: posts, pages and a portfolio, published as a static site

Content lives in a SQLite database. 'folio publish' renders every published
post, every page, the home page, the post listing and the portfolio into a
flat directory of HTML files using the templates in your theme:

  theme/
  ├── templates/
  │   ├── header.html      # prepended to every page except portfolio.html
  │   ├── footer.html      # appended to every page except portfolio.html
  │   ├── index.html       # 10 newest posts + portfolio items
  │   ├── posts.html       # all posts with excerpts
  │   ├── post.html        # one post
  │   ├── page.html        # one page
  │   └── portfolio.html   # complete document, not framed
  └── static/css/*.css     # copied to <output>/css/

Run 'folio init' to create the database and a starter theme, and
'folio gen-config' to print a documented folio.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// SQLite database (overrides db_path)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Template directory (overrides template_path)
    #[arg(long, global = true)]
    templates: Option<PathBuf>,

    /// Output directory (overrides output_path)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the database and install the starter theme
    Init,
    /// Apply pending database migrations
    Migrate,
    /// Generate the static site
    Publish,
    /// Print a folio.toml with all options documented
    GenConfig,
    /// Manage blog posts
    #[command(subcommand)]
    Post(PostCommand),
    /// Manage static pages
    #[command(subcommand)]
    Page(PageCommand),
    /// Manage portfolio items
    #[command(subcommand)]
    Portfolio(PortfolioCommand),
    /// Show or change site settings
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Browse and edit the template directory
    #[command(subcommand)]
    Templates(TemplatesCommand),
}

/// Markdown body, inline or from a file.
#[derive(Args)]
#[group(multiple = false)]
struct Body {
    /// Markdown content
    #[arg(long)]
    content: Option<String>,
    /// Read markdown content from a file
    #[arg(long)]
    file: Option<PathBuf>,
}

impl Body {
    /// `None` when neither flag was given.
    fn read_opt(self) -> std::io::Result<Option<String>> {
        match (self.content, self.file) {
            (Some(content), _) => Ok(Some(content)),
            (None, Some(path)) => std::fs::read_to_string(path).map(Some),
            (None, None) => Ok(None),
        }
    }

    fn read(self) -> std::io::Result<String> {
        Ok(self.read_opt()?.unwrap_or_default())
    }
}

#[derive(Subcommand)]
enum PostCommand {
    /// Create a post
    Create {
        #[arg(long)]
        title: String,
        /// Defaults to a slug derived from the title
        #[arg(long)]
        slug: Option<String>,
        #[command(flatten)]
        body: Body,
        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
        /// Publish immediately
        #[arg(long)]
        published: bool,
    },
    /// List posts, newest first
    List {
        #[arg(long, default_value_t = 20)]
        limit: usize,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Show a post with its content
    Show { id: i64 },
    /// Change a post; omitted flags keep their value
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        slug: Option<String>,
        #[command(flatten)]
        body: Body,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// Mark a post as published
    Publish { id: i64 },
    /// Mark a post as draft
    Unpublish { id: i64 },
    /// Delete a post
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum PageCommand {
    /// Create a page
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        slug: Option<String>,
        #[command(flatten)]
        body: Body,
        /// Link the page from the navigation bar
        #[arg(long)]
        nav: bool,
        #[arg(long, default_value_t = 0)]
        order: i64,
    },
    /// List pages in navigation order
    List,
    /// Show a page with its content, by id or slug
    Show {
        #[arg(required_unless_present = "slug")]
        id: Option<i64>,
        #[arg(long, conflicts_with = "id")]
        slug: Option<String>,
    },
    /// Change a page; omitted flags keep their value
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        slug: Option<String>,
        #[command(flatten)]
        body: Body,
        #[arg(long)]
        nav: Option<bool>,
        #[arg(long)]
        order: Option<i64>,
    },
    /// Delete a page
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum PortfolioCommand {
    /// Create a portfolio item
    Create {
        #[arg(long)]
        title: String,
        /// Markdown
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        project_url: String,
        #[arg(long, default_value = "")]
        github_url: String,
        #[arg(long, default_value = "")]
        image: String,
        #[arg(long, default_value_t = 0)]
        order: i64,
    },
    /// List portfolio items in display order
    List {
        #[arg(long, default_value_t = 20)]
        limit: usize,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Show a portfolio item
    Show { id: i64 },
    /// Change a portfolio item; omitted flags keep their value
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        /// Markdown
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        project_url: Option<String>,
        #[arg(long)]
        github_url: Option<String>,
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        order: Option<i64>,
    },
    /// Delete a portfolio item
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print current settings
    Show,
    /// Change settings; omitted flags keep their value
    Set {
        #[arg(long)]
        site_name: Option<String>,
        #[arg(long)]
        show_posts_menu: Option<bool>,
        #[arg(long)]
        show_portfolio_menu: Option<bool>,
        /// JSON array, e.g. '["home","pages","posts"]'
        #[arg(long)]
        menu_order: Option<String>,
    },
}

#[derive(Subcommand)]
enum TemplatesCommand {
    /// List files in the template directory
    List,
    /// Print a template file
    Show {
        /// Path relative to the template directory
        path: String,
    },
    /// Replace a template file, keeping the old one as <path>.bak
    Edit {
        /// Path relative to the template directory
        path: String,
        #[command(flatten)]
        body: Body,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::template());
        return Ok(());
    }

    let mut app = AppConfig::load(&cli.config)?;
    app.apply(Overrides {
        db_path: cli.db,
        template_path: cli.templates,
        output_path: cli.output,
    });
    app.validate()?;

    match cli.command {
        Command::Init => {
            open_store(&app)?;
            let written = templates::install_starter(&app.template_path)?;
            println!("Database ready: {}", app.db_path.display());
            for path in &written {
                println!("    {}", path.display());
            }
            println!(
                "Installed {} starter files into {}",
                written.len(),
                app.template_path.display()
            );
        }
        Command::Migrate => {
            let store = SqliteStore::open(&app.db_path)?;
            let applied = store.migrate()?;
            println!("Applied {applied} migrations");
        }
        Command::Publish => {
            let store = open_store(&app)?;
            let outcome = generate::publish(&store, app.generator_config())?;
            output::print_publish_output(&outcome);
        }
        // printed before loading config
        Command::GenConfig => {}
        Command::Post(cmd) => run_post(&open_store(&app)?, cmd)?,
        Command::Page(cmd) => run_page(&open_store(&app)?, cmd)?,
        Command::Portfolio(cmd) => run_portfolio(&open_store(&app)?, cmd)?,
        Command::Settings(cmd) => run_settings(&open_store(&app)?, cmd)?,
        Command::Templates(cmd) => run_templates(&app.template_path, cmd)?,
    }

    Ok(())
}

/// Open the database and bring its schema up to date.
fn open_store(app: &AppConfig) -> Result<SqliteStore, Box<dyn std::error::Error>> {
    let store = SqliteStore::open(&app.db_path)?;
    store.migrate()?;
    Ok(store)
}

fn slug_or_title(explicit: Option<String>, title: &str) -> String {
    explicit.unwrap_or_else(|| slug::slugify(title))
}

fn run_post(store: &SqliteStore, cmd: PostCommand) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        PostCommand::Create {
            title,
            slug,
            body,
            tags,
            published,
        } => {
            let post = NewPost {
                slug: slug_or_title(slug, &title),
                title,
                content: body.read()?,
                tags,
                published,
                created_at: None,
            };
            let id = store.create_post(&post)?;
            println!("Created post {id} ({})", post.slug);
        }
        PostCommand::List { limit, offset } => {
            let (posts, total) = store.list_posts(limit, offset)?;
            output::print_post_list(&posts, total);
        }
        PostCommand::Show { id } => output::print_post_detail(&store.get_post(id)?),
        PostCommand::Edit {
            id,
            title,
            slug,
            body,
            tags,
        } => {
            let mut post = NewPost::from(&store.get_post(id)?);
            if let Some(title) = title {
                post.title = title;
            }
            if let Some(slug) = slug {
                post.slug = slug;
            }
            if let Some(content) = body.read_opt()? {
                post.content = content;
            }
            if let Some(tags) = tags {
                post.tags = tags;
            }
            store.update_post(id, &post)?;
            println!("Updated post {id} ({})", post.slug);
        }
        PostCommand::Publish { id } => {
            store.set_post_published(id, true)?;
            println!("Published post {id}");
        }
        PostCommand::Unpublish { id } => {
            store.set_post_published(id, false)?;
            println!("Unpublished post {id}");
        }
        PostCommand::Delete { id } => {
            store.delete_post(id)?;
            println!("Deleted post {id}");
        }
    }
    Ok(())
}

fn run_page(store: &SqliteStore, cmd: PageCommand) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        PageCommand::Create {
            title,
            slug,
            body,
            nav,
            order,
        } => {
            let page = NewPage {
                slug: slug_or_title(slug, &title),
                title,
                content: body.read()?,
                show_in_nav: nav,
                sort_order: order,
                created_at: None,
            };
            let id = store.create_page(&page)?;
            println!("Created page {id} ({})", page.slug);
        }
        PageCommand::List => output::print_page_list(&store.all_pages()?),
        PageCommand::Show { id, slug } => {
            let page = match (id, slug) {
                (Some(id), _) => store.get_page(id)?,
                (None, Some(slug)) => store.page_by_slug(&slug)?,
                (None, None) => return Err("page show needs an id or --slug".into()),
            };
            output::print_page_detail(&page);
        }
        PageCommand::Edit {
            id,
            title,
            slug,
            body,
            nav,
            order,
        } => {
            let mut page = NewPage::from(&store.get_page(id)?);
            if let Some(title) = title {
                page.title = title;
            }
            if let Some(slug) = slug {
                page.slug = slug;
            }
            if let Some(content) = body.read_opt()? {
                page.content = content;
            }
            if let Some(nav) = nav {
                page.show_in_nav = nav;
            }
            if let Some(order) = order {
                page.sort_order = order;
            }
            store.update_page(id, &page)?;
            println!("Updated page {id} ({})", page.slug);
        }
        PageCommand::Delete { id } => {
            store.delete_page(id)?;
            println!("Deleted page {id}");
        }
    }
    Ok(())
}

fn run_portfolio(
    store: &SqliteStore,
    cmd: PortfolioCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        PortfolioCommand::Create {
            title,
            description,
            project_url,
            github_url,
            image,
            order,
        } => {
            let id = store.create_portfolio_item(&NewPortfolioItem {
                title,
                short_description: description,
                project_url,
                github_url,
                showcase_image: image,
                sort_order: order,
                created_at: None,
            })?;
            println!("Created portfolio item {id}");
        }
        PortfolioCommand::List { limit, offset } => {
            let (items, total) = store.list_portfolio_items(limit, offset)?;
            output::print_portfolio_list(&items, total);
        }
        PortfolioCommand::Show { id } => {
            output::print_portfolio_detail(&store.get_portfolio_item(id)?)
        }
        PortfolioCommand::Edit {
            id,
            title,
            description,
            project_url,
            github_url,
            image,
            order,
        } => {
            let mut item = NewPortfolioItem::from(&store.get_portfolio_item(id)?);
            if let Some(title) = title {
                item.title = title;
            }
            if let Some(description) = description {
                item.short_description = description;
            }
            if let Some(url) = project_url {
                item.project_url = url;
            }
            if let Some(url) = github_url {
                item.github_url = url;
            }
            if let Some(image) = image {
                item.showcase_image = image;
            }
            if let Some(order) = order {
                item.sort_order = order;
            }
            store.update_portfolio_item(id, &item)?;
            println!("Updated portfolio item {id}");
        }
        PortfolioCommand::Delete { id } => {
            store.delete_portfolio_item(id)?;
            println!("Deleted portfolio item {id}");
        }
    }
    Ok(())
}

fn run_settings(
    store: &SqliteStore,
    cmd: SettingsCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        SettingsCommand::Show => output::print_settings(&store.settings()?),
        SettingsCommand::Set {
            site_name,
            show_posts_menu,
            show_portfolio_menu,
            menu_order,
        } => {
            let mut settings = store.settings()?;
            if let Some(name) = site_name {
                settings.site_name = name;
            }
            if let Some(show) = show_posts_menu {
                settings.show_posts_menu = show;
            }
            if let Some(show) = show_portfolio_menu {
                settings.show_portfolio_menu = show;
            }
            if let Some(order) = menu_order {
                if let Err(e) = nav::parse_menu_order(&order) {
                    return Err(format!("invalid menu_order: {}", e.reason).into());
                }
                settings.menu_order = order;
            }
            store.update_settings(&settings)?;
            output::print_settings(&settings);
        }
    }
    Ok(())
}

fn run_templates(root: &Path, cmd: TemplatesCommand) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        TemplatesCommand::List => output::print_template_list(&templates::list_templates(root)?),
        TemplatesCommand::Show { path } => print!("{}", templates::read_template(root, &path)?),
        TemplatesCommand::Edit { path, body } => {
            let Some(content) = body.read_opt()? else {
                return Err("templates edit needs --content or --file".into());
            };
            let backup = templates::save_template(root, &path, &content)?;
            output::print_template_saved(&path, backup.as_deref());
        }
    }
    Ok(())
}
