use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tabelog_scout::{
    Config, OpenAiExtractor, PriceRange, QueryExtractor, SearchOrchestrator,
    SearchRequest, SearchResponse, SearchStatus, SortType, TabelogClient,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Tabelog restaurant search
#[derive(Parser, Debug)]
#[command(name = "tabelog", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search restaurants by area, keyword and filters
    Search(SearchArgs),
    /// Describe what you want to eat in plain language
    Ask(AskArgs),
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Area to search in, e.g. 東京
    #[arg(short, long)]
    area: Option<String>,

    /// Keyword such as a dish or genre, e.g. 寿司
    #[arg(short, long)]
    keyword: Option<String>,

    /// standard, ranking, review_count or new_open
    #[arg(long, default_value = "standard")]
    sort: SortType,

    /// Budget code, B001-B012 (lunch) or C001-C012 (dinner)
    #[arg(long)]
    price: Option<PriceRange>,

    /// Reservation date, YYYYMMDD
    #[arg(long)]
    date: Option<String>,

    /// Reservation time, HHMM
    #[arg(long)]
    time: Option<String>,

    /// Number of people
    #[arg(long)]
    party: Option<u32>,

    #[arg(long)]
    online_booking: bool,

    #[arg(long)]
    seat_only: bool,

    #[arg(long)]
    new_open: bool,

    #[arg(long)]
    private_room: bool,

    #[arg(long)]
    parking: bool,

    #[arg(long)]
    smoking: bool,

    #[arg(long)]
    card: bool,

    /// Skip result-count metadata (also disables page-limit clamping)
    #[arg(long)]
    no_meta: bool,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct AskArgs {
    /// e.g. "新宿で美味しいラーメンが食べたい"
    text: String,

    #[arg(long, default_value = "standard")]
    sort: SortType,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Pages to fetch at most
    #[arg(long, default_value_t = 1)]
    max_pages: u32,

    /// Print the full response as JSON
    #[arg(long)]
    json: bool,

    /// Also save the response as JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so --json output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let (request, output) = match cli.command {
        Command::Search(args) => (search_request(&args, &config)?, args.output),
        Command::Ask(args) => {
            let extractor = OpenAiExtractor::from_config(&config)?;
            let query = extractor
                .parse_user_input(&args.text)
                .await
                .context("Failed to understand the request")?;
            info!("🔎 area: {:?}, keyword: {:?}", query.area, query.keyword);

            let request = SearchRequest::builder()
                .area(query.area)
                .keyword(query.keyword)
                .sort_type(args.sort)
                .max_pages(args.output.max_pages)
                .timeout(config.timeout)
                .build()?;
            (request, args.output)
        }
    };

    let client = TabelogClient::with_config(&config).context("Failed to create HTTP client")?;
    // one search per process, so no response cache
    let orchestrator = SearchOrchestrator::new(client);

    let response = orchestrator.execute(&request).await;

    if let Some(path) = &output.output {
        let json = serde_json::to_string_pretty(&response)?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("💾 Saved response to {}", path.display());
    }

    if output.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_response(&response);
    }

    if let (SearchStatus::Error, Some(message)) = (response.status, &response.error_message) {
        bail!("Search failed: {}", message);
    }

    Ok(())
}

fn search_request(args: &SearchArgs, config: &Config) -> anyhow::Result<SearchRequest> {
    let mut builder = SearchRequest::builder()
        .sort_type(args.sort)
        .online_booking_only(args.online_booking)
        .seat_only(args.seat_only)
        .new_open(args.new_open)
        .private_room(args.private_room)
        .parking(args.parking)
        .smoking_allowed(args.smoking)
        .card_accepted(args.card)
        .max_pages(args.output.max_pages)
        .include_meta(!args.no_meta)
        .timeout(config.timeout);

    if let Some(area) = &args.area {
        builder = builder.area(area.as_str());
    }
    if let Some(keyword) = &args.keyword {
        builder = builder.keyword(keyword.as_str());
    }
    if let Some(price) = args.price {
        builder = builder.price_range(price);
    }
    if let Some(date) = &args.date {
        builder = builder.reservation_date(date.as_str());
    }
    if let Some(time) = &args.time {
        builder = builder.reservation_time(time.as_str());
    }
    if let Some(party) = args.party {
        builder = builder.party_size(party);
    }

    Ok(builder.build()?)
}

fn print_response(response: &SearchResponse) {
    match response.status {
        SearchStatus::Error => return,
        SearchStatus::NoResults => {
            println!("No restaurants found.");
            return;
        }
        SearchStatus::Success => {}
    }

    if let Some(meta) = &response.meta {
        println!(
            "{} restaurants in total, page {}/{}\n",
            meta.total_count, meta.current_page, meta.total_pages
        );
    }

    for (i, restaurant) in response.restaurants.iter().enumerate() {
        let rating = restaurant
            .rating
            .map(|r| format!("{:.2}", r))
            .unwrap_or_else(|| "-".to_string());
        let reviews = restaurant
            .review_count
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());

        println!("{}. {} (★ {}, {} reviews)", i + 1, restaurant.name, rating, reviews);
        if let Some(area) = &restaurant.area {
            match (&restaurant.station, &restaurant.distance) {
                (Some(station), Some(distance)) => println!("   Area: {} / {} {}", area, station, distance),
                _ => println!("   Area: {}", area),
            }
        }
        if !restaurant.genres.is_empty() {
            println!("   Genres: {}", restaurant.genres.join(", "));
        }
        if let Some(price) = &restaurant.lunch_price {
            println!("   Lunch: {}", price);
        }
        if let Some(price) = &restaurant.dinner_price {
            println!("   Dinner: {}", price);
        }
        println!("   URL: {}", restaurant.url);
        println!();
    }
}
