//! `storefront` command-line driver
//!
//! Runs one storefront session per invocation against the durable cart in
//! the configured storage directory.

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::sync::Arc;
use storefront_checkout::{ContactForm, CSRF_FIELD};
use storefront_ui::{
    Notice, Notifier, PageBindings, Panel, PanelState, Storefront, StorefrontConfig,
};
use tracing_subscriber::{fmt, EnvFilter};

/// Prints notices the way the page would show them
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        if notice.is_error() {
            eprintln!("{notice}");
        } else {
            println!("{notice}");
        }
    }
}

fn cli() -> Command {
    Command::new("storefront")
        .version(storefront_ui::VERSION)
        .about("Storefront cart, checkout and contact queries")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .env("STOREFRONT_CONFIG")
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("endpoint")
                .long("endpoint")
                .global(true)
                .env("STOREFRONT_ENDPOINT")
                .help("Query endpoint for orders and contact messages"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines on stderr"),
        )
        .arg(
            Arg::new("storage-dir")
                .long("storage-dir")
                .global(true)
                .env("STOREFRONT_STORAGE_DIR")
                .value_parser(value_parser!(PathBuf))
                .help("Directory holding the saved cart"),
        )
        .subcommand(
            Command::new("add")
                .about("Add one unit of a product")
                .arg(Arg::new("name").required(true).help("Product name"))
                .arg(Arg::new("price").required(true).help("Unit price as displayed"))
                .arg(
                    Arg::new("image")
                        .long("image")
                        .default_value("")
                        .help("Product image URL"),
                ),
        )
        .subcommand(
            Command::new("remove")
                .about("Remove a product from the cart")
                .arg(
                    Arg::new("index")
                        .value_parser(value_parser!(usize))
                        .required_unless_present("name")
                        .conflicts_with("name")
                        .help("Row position as shown by `list`"),
                )
                .arg(Arg::new("name").long("name").help("Product name")),
        )
        .subcommand(
            Command::new("list")
                .about("Show the cart")
                .arg(
                    Arg::new("html")
                        .long("html")
                        .action(ArgAction::SetTrue)
                        .help("Print cart markup instead of rows"),
                ),
        )
        .subcommand(Command::new("clear").about("Empty the cart"))
        .subcommand(
            Command::new("checkout")
                .about("Place an order for the cart contents")
                .arg(
                    Arg::new("email")
                        .long("email")
                        .default_value("")
                        .help("Contact email for the order"),
                )
                .arg(
                    Arg::new("csrf-token")
                        .long("csrf-token")
                        .env("STOREFRONT_CSRF_TOKEN")
                        .help("CSRF token issued by the backend"),
                ),
        )
        .subcommand(
            Command::new("contact")
                .about("Send a contact query")
                .arg(
                    Arg::new("field")
                        .long("field")
                        .action(ArgAction::Append)
                        .value_parser(parse_field)
                        .help("Form field as name=value, in page order"),
                )
                .arg(
                    Arg::new("csrf-token")
                        .long("csrf-token")
                        .env("STOREFRONT_CSRF_TOKEN")
                        .help("CSRF token issued by the backend"),
                ),
        )
        .subcommand(
            Command::new("panels")
                .about("Replay overlay events and print the resulting states")
                .arg(
                    Arg::new("events")
                        .action(ArgAction::Append)
                        .value_parser(["search", "cart", "menu", "scroll"])
                        .help("Toggle a panel, or scroll"),
                ),
        )
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))
}

fn load_config(matches: &ArgMatches) -> Result<StorefrontConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => StorefrontConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => StorefrontConfig::default(),
    };
    if let Some(endpoint) = matches.get_one::<String>("endpoint") {
        config = config.with_endpoint(endpoint);
    }
    if let Some(dir) = matches.get_one::<PathBuf>("storage-dir") {
        config = config.with_storage_dir(dir.clone());
    }
    Ok(config)
}

fn page(email: Option<&String>, csrf_token: Option<&String>) -> PageBindings {
    let mut page = PageBindings::full();
    if let Some(email) = email {
        page = page.with_email(email.as_str());
    }
    if let Some(token) = csrf_token {
        page = page.with_csrf_token(token.as_str());
    }
    page
}

fn print_cart(storefront: &Storefront, currency_label: &str, html: bool) -> Result<()> {
    if html {
        let markup = storefront
            .rendered_html()
            .context("cart container not rendered")?;
        print!("{markup}");
        return Ok(());
    }

    let rendered = storefront
        .rendered()
        .context("cart container not rendered")?;
    if rendered.view.is_empty() {
        println!("Cart is empty");
        return Ok(());
    }
    for row in rendered.view.rows() {
        println!(
            "{:>3}  {} (Qty: {}) - {} {}",
            row.position, row.name, row.quantity, row.price, currency_label
        );
    }
    let engine = storefront.engine();
    println!(
        "Items: {}  Total: {:.2} {}",
        engine.total_quantity(),
        engine.total_price(),
        currency_label
    );
    Ok(())
}

fn print_panels(state: PanelState) {
    let flags = state.flags();
    println!(
        "{:<11} search={} cart={} menu={}",
        format!("{state:?}"),
        flags.search,
        flags.cart,
        flags.menu
    );
}

async fn run(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    let notifier = Arc::new(ConsoleNotifier);
    let label = config.currency_label.clone();

    match matches.subcommand() {
        Some(("add", args)) => {
            let name = args.get_one::<String>("name").context("missing name")?;
            let price = args.get_one::<String>("price").context("missing price")?;
            let image = args.get_one::<String>("image").cloned().unwrap_or_default();

            let mut storefront = Storefront::from_config(&config, page(None, None), notifier);
            let outcome = storefront.add_to_cart(name, price, image)?;
            tracing::debug!("Add outcome: {:?}", outcome);
            print_cart(&storefront, &label, false)?;
        }
        Some(("remove", args)) => {
            let mut storefront = Storefront::from_config(&config, page(None, None), notifier);
            let removed = if let Some(name) = args.get_one::<String>("name") {
                storefront.remove_product(name)?
            } else {
                let index = *args.get_one::<usize>("index").context("missing index")?;
                let binding = storefront
                    .rendered()
                    .and_then(|rendered| rendered.binding(index))
                    .with_context(|| format!("no cart row at position {index}"))?;
                storefront
                    .click_remove(binding)?
                    .with_context(|| format!("no cart row at position {index}"))?
            };
            println!("Removed {}", removed.name);
            print_cart(&storefront, &label, false)?;
        }
        Some(("list", args)) => {
            let storefront = Storefront::from_config(&config, page(None, None), notifier);
            print_cart(&storefront, &label, args.get_flag("html"))?;
        }
        Some(("clear", _)) => {
            let mut storefront = Storefront::from_config(&config, page(None, None), notifier);
            storefront.clear_cart()?;
            println!("Cart cleared");
        }
        Some(("checkout", args)) => {
            let page = page(
                args.get_one::<String>("email"),
                args.get_one::<String>("csrf-token"),
            );
            let transport = Storefront::http_transport(&config)?;
            let mut storefront = Storefront::from_config(&config, page, notifier);
            let outcome = storefront
                .checkout(&transport)
                .await?
                .context("checkout is not available on this page")?;
            if !outcome.is_accepted() {
                bail!("order was not placed");
            }
        }
        Some(("contact", args)) => {
            let mut form = ContactForm::new();
            if let Some(token) = args.get_one::<String>("csrf-token") {
                form.set_field(CSRF_FIELD, token.as_str());
            }
            for (name, value) in args
                .get_many::<(String, String)>("field")
                .into_iter()
                .flatten()
            {
                form.set_field(name.as_str(), value.as_str());
            }

            let transport = Storefront::http_transport(&config)?;
            let storefront = Storefront::from_config(&config, page(None, None), notifier);
            storefront
                .submit_contact(&mut form, &transport)
                .await?
                .context("contact form is not available on this page")?;
        }
        Some(("panels", args)) => {
            let mut storefront = Storefront::from_config(&config, page(None, None), notifier);
            print_panels(storefront.panel_state());
            for event in args.get_many::<String>("events").into_iter().flatten() {
                let state = match event.as_str() {
                    "search" => storefront.toggle(Panel::Search),
                    "cart" => storefront.toggle(Panel::Cart),
                    "menu" => storefront.toggle(Panel::Menu),
                    _ => storefront.scroll(),
                };
                print_panels(state);
            }
        }
        Some((other, _)) => bail!("unknown command '{other}'"),
        None => bail!("no command given"),
    }
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    run(&matches).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn fields_parse_as_name_value() {
        assert_eq!(
            parse_field("message=a=b").unwrap(),
            ("message".to_string(), "a=b".to_string())
        );
        assert!(parse_field("=x").is_err());
        assert!(parse_field("novalue").is_err());
    }

    #[test]
    fn flags_override_config() {
        let matches = cli()
            .try_get_matches_from([
                "storefront",
                "--endpoint",
                "https://shop.example/send-query-email/",
                "--storage-dir",
                "/tmp/cart",
                "list",
            ])
            .unwrap();
        let config = load_config(&matches).unwrap();

        assert_eq!(config.endpoint, "https://shop.example/send-query-email/");
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/cart"));
    }

    #[test]
    fn page_without_token_has_none() {
        let email = "a@b.c".to_string();
        let page = page(Some(&email), None);
        assert_eq!(page.email(), Some("a@b.c"));
        assert_eq!(page.csrf_token(), None);
    }
}
