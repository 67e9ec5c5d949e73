//! hitnote-seed - database seeding tool
//!
//! Bootstraps the schema and fills the catalogue with a fixed set of
//! songs plus randomized reviews, for local development and demos.
//! `--reset` drops every table first. The RNG is seeded for
//! reproducibility, so repeated runs on a fresh database produce the
//! same data.

use anyhow::Result;
use clap::Parser;
use hitnote_common::auth::password::hash_password;
use hitnote_common::db::{init, music, reviews, users, Db};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tracing::info;

const SONGS: &[(&str, &str, &str, &str)] = &[
    ("Bohemian Rhapsody", "Queen", "A Night at the Opera", "1975-10-31"),
    ("Blinding Lights", "The Weeknd", "After Hours", "2019-11-29"),
    ("Shape of You", "Ed Sheeran", "÷ (Divide)", "2017-01-06"),
    ("Hotel California", "Eagles", "Hotel California", "1976-12-08"),
    ("Billie Jean", "Michael Jackson", "Thriller", "1982-11-30"),
    ("Stairway to Heaven", "Led Zeppelin", "Led Zeppelin IV", "1971-11-08"),
    ("Imagine", "John Lennon", "Imagine", "1971-09-09"),
    ("Paranoid Android", "Radiohead", "OK Computer", "1997-05-21"),
    ("Smells Like Teen Spirit", "Nirvana", "Nevermind", "1991-09-24"),
    ("Good Vibrations", "The Beach Boys", "Smiley Smile", "1966-10-10"),
];

const COMMENTS: &[&str] = &[
    "Clássico absoluto! Volto sempre a ouvir.",
    "Produção impecável e letra marcante.",
    "Melodia grudenta, não sai da cabeça!",
    "Uma obra-prima, arranjo e dinâmica fantásticos.",
    "Refrão forte e ótima performance vocal.",
    "Bom, mas prefiro outras do álbum.",
    "Letra potente e instrumental muito bem feito.",
    "A energia dessa faixa é sensacional!",
    "Tenho ouvido em loop nos últimos dias.",
    "A mixagem é um show à parte.",
];

#[derive(Parser, Debug)]
#[command(name = "hitnote-seed", about = "Seed the HitNote database")]
struct Args {
    /// Path to the SQLite database file
    #[arg(long, env = "HITNOTE_DB_PATH", default_value = "bd_hitnote.db")]
    db_path: PathBuf,

    /// Drop all tables before seeding
    #[arg(long)]
    reset: bool,

    /// RNG seed for review generation
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let db = Db::new(&args.db_path);

    if args.reset {
        init::drop_all_tables(&db).await?;
    }
    init::create_all_tables(&db).await?;

    // Reviews need an author; the bot account owns the seeded ones.
    let bot = match users::get_user_by_email(&db, "bot@hitnote.local").await? {
        Some(user) => user,
        None => {
            let hash = hash_password("hitnote-bot")?;
            users::create_user(&db, "HitNote Bot", "hitnote_bot", "bot@hitnote.local", &hash)
                .await?
        }
    };

    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut total_reviews = 0usize;

    for (nome, artista, album, data_lancamento) in SONGS {
        let song = music::create_music(&db, nome, artista, album, data_lancamento, "").await?;

        for _ in 0..rng.gen_range(1..=6) {
            let nota = (rng.gen_range(3.0..=5.0f64) * 10.0).round() / 10.0;
            let comentario = COMMENTS[rng.gen_range(0..COMMENTS.len())];
            reviews::create_review(&db, song.id, nota, comentario, bot.id).await?;
            total_reviews += 1;
        }
    }

    info!("Seeded {} songs and {} reviews", SONGS.len(), total_reviews);
    Ok(())
}
