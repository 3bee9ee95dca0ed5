//! The interactive study loop and card creation.

use std::{
  io::{BufRead, Write},
  sync::Arc,
};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use uuid::Uuid;

use cram_core::{
  card::{Card, CardKind},
  scheduler::Difficulty,
  session::Phase,
  store::{DeckBackend, LocationSampler},
};
use cram_engine::{
  NearbyWatcher, SAMPLE_PERIOD, StudyRunner, suggest_location_tag,
};

use crate::App;

/// Run one study session over `deck_id`.
pub async fn run(app: &App, deck_id: &str) -> Result<()> {
  let backend = Arc::new(app.client.clone());
  let mut runner = StudyRunner::load(backend, deck_id)
    .await
    .context("loading deck")?;

  if runner.phase() == Phase::NoCards {
    println!("This deck has no cards yet.");
    return Ok(());
  }

  if !app.sampler.has_permission() {
    app.sampler.request_permission();
  }
  let watcher = NearbyWatcher::start(
    Arc::new(app.sampler.clone()),
    Arc::new(app.store.clone()),
    SAMPLE_PERIOD,
  );

  while runner.phase() == Phase::Presenting {
    if let Some(name) = watcher.current() {
      println!("~ you are near {name} ~");
    }

    let (prompt_text, topic, options, index, total) = {
      let card = runner.current_card().expect("presenting card");
      (
        card.prompt.clone(),
        card.topic.clone(),
        card.options.clone(),
        runner.session().current_index() + 1,
        runner.session().total(),
      )
    };

    println!();
    println!("Card {index}/{total}  [{topic}]");
    println!("{prompt_text}");
    for (i, option) in options.iter().enumerate() {
      println!("  {}) {option}", i + 1);
    }

    let answer = loop {
      let line = prompt("Answer number: ")?;
      match line.parse::<usize>() {
        Ok(n) if (1..=options.len()).contains(&n) => break n - 1,
        _ => println!("Enter a number between 1 and {}.", options.len()),
      }
    };

    let correct = runner.select_answer(answer)?;
    if correct {
      println!("Correct!");
    } else {
      let card = runner.current_card().expect("revealed card");
      let answer_text = card
        .options
        .get(card.correct_index)
        .map(String::as_str)
        .unwrap_or("<missing option>");
      println!(
        "Wrong, the answer was {}) {answer_text}.",
        card.correct_index + 1,
      );
    }

    let difficulty = loop {
      let line = prompt("How hard was it? (easy/medium/hard/impossible): ")?;
      match line.parse::<Difficulty>() {
        Ok(d) => break d,
        Err(e) => println!("{e}"),
      }
    };

    // Detached write: the session moves on while the deck is persisted.
    runner.select_difficulty(difficulty)?;
    if let Some(message) = runner.take_persist_error() {
      eprintln!("warning: saving progress failed: {message}");
    }
    runner.next_card()?;
  }

  // The last grading's write may still be in flight; wait it out so the
  // final grade is persisted (or its failure reported) before we return.
  runner.flush_writes().await;

  let summary = runner.summary();
  println!();
  println!(
    "Session complete: {}/{} correct ({}%).",
    summary.correct, summary.total, summary.percent,
  );
  if let Some(message) = runner.take_persist_error() {
    eprintln!("warning: saving progress failed: {message}");
  }

  watcher.stop().await;
  Ok(())
}

/// Interactively add a card to a deck, pre-filling the location tag from the
/// nearest saved location.
pub async fn add_card(app: &App, deck_id: &str) -> Result<()> {
  let mut deck = app.client.get(deck_id).await.context("fetching deck")?;

  let topic = prompt("Topic: ")?;
  let prompt_text = prompt("Prompt: ")?;

  let kind = loop {
    let line =
      prompt("Kind (multipleChoice/trueFalse/shortAnswer): ")?;
    match CardKind::from_backend(&line) {
      Ok(kind) => break kind,
      Err(e) => println!("{e}"),
    }
  };

  let options: Vec<String> = if kind == CardKind::TrueFalse {
    vec!["True".into(), "False".into()]
  } else {
    loop {
      let line = prompt("Options (comma-separated): ")?;
      let opts: Vec<String> = line
        .split(',')
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect();
      if opts.len() >= 2 {
        break opts;
      }
      println!("Give at least two options.");
    }
  };

  let correct_index = loop {
    let line = prompt("Correct option number: ")?;
    match line.parse::<usize>() {
      Ok(n) if (1..=options.len()).contains(&n) => break n - 1,
      _ => println!("Enter a number between 1 and {}.", options.len()),
    }
  };

  let suggestion = suggest_location_tag(&app.sampler, &app.store).await;
  let location_tag = match suggestion {
    Some(name) => {
      let line = prompt(&format!("Location tag [{name}]: "))?;
      if line.is_empty() { Some(name) } else { Some(line) }
    }
    None => {
      let line = prompt("Location tag (blank for none): ")?;
      (!line.is_empty()).then_some(line)
    }
  };

  deck.cards.push(Card {
    id: Uuid::new_v4(),
    topic,
    kind,
    prompt: prompt_text,
    correct_index,
    options,
    location_tag,
    next_review: Utc::now(),
  });

  app.client.update(&deck).await.context("saving deck")?;
  println!("Card added to {}.", deck.title);
  Ok(())
}

/// Print `message`, then read one trimmed line from stdin.
fn prompt(message: &str) -> Result<String> {
  print!("{message}");
  std::io::stdout().flush().context("flushing stdout")?;

  let mut line = String::new();
  let read = std::io::stdin()
    .lock()
    .read_line(&mut line)
    .context("reading stdin")?;
  if read == 0 {
    bail!("input closed");
  }
  Ok(line.trim().to_owned())
}
