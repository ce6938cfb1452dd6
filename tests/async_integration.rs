mod common;

use anyhow::Result;
use batch_csv::{CsvEngine, CsvEngineBuilder, CsvError, record::Row};
use tokio_util::sync::CancellationToken;

use common::{Person, Product, init_logger, people_csv, products};

#[tokio::test]
async fn people_should_be_read_and_written_asynchronously() -> Result<()> {
    init_logger();
    let csv = "Name;Age\nAda;36\nAlan;41\n";
    let engine = CsvEngineBuilder::new().delimiter(";").build()?;

    let people: Vec<Person> = engine.read_all_async(csv.as_bytes()).await?;
    assert_eq!(people, vec![Person::new("Ada", 36), Person::new("Alan", 41)]);

    let mut writer = engine.async_writer::<Person, _>(Vec::<u8>::new())?;
    writer.write_all(&people).await?;
    let output = writer.into_inner().await?;

    assert_eq!(String::from_utf8(output)?, csv);
    Ok(())
}

#[tokio::test]
async fn products_should_round_trip_through_a_file() -> Result<()> {
    let engine = CsvEngineBuilder::new().batch_size(2).build()?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("products.csv");

    let mut writer = engine.async_writer_to_path::<Product, _>(&path).await?;
    writer.write_all(&products()[..1]).await?;
    writer.write_all(&products()[1..]).await?;
    writer.close().await?;
    drop(writer);

    let mut reader = engine.async_reader_from_path::<Product, _>(&path).await?;
    let read = reader.read_to_vec(3).await?;

    assert_eq!(read, products());
    assert_eq!(reader.header()[0], "Product ID");
    Ok(())
}

#[tokio::test]
async fn every_batch_size_should_yield_the_same_rows() -> Result<()> {
    let count = 12;
    let csv = people_csv(count);

    for batch_size in [1, count - 1, count, count + 1, 10_000] {
        let engine = CsvEngineBuilder::new()
            .delimiter(";")
            .batch_size(batch_size)
            .build()?;

        let rows = engine
            .async_row_reader(csv.as_bytes())
            .read_to_vec(count)
            .await?;

        assert_eq!(rows.len(), count, "batch size {batch_size}");
        assert_eq!(rows[count - 1].get("Name"), Some("person-11"));
    }
    Ok(())
}

#[tokio::test]
async fn logged_conversion_failure_should_end_the_stream() -> Result<()> {
    let engine = CsvEngineBuilder::new()
        .delimiter(";")
        .log_errors(true)
        .batch_size(1)
        .build()?;

    let mut reader = engine.async_reader::<Person, _>("Name;Age\nAda;36\nBob;-1\n".as_bytes())?;

    assert_eq!(reader.next().await?, Some(Person::new("Ada", 36)));
    assert!(matches!(
        reader.next().await,
        Err(CsvError::Conversion { .. })
    ));
    assert_eq!(reader.next().await?, None);
    Ok(())
}

#[tokio::test]
async fn cancellation_should_be_observed_at_the_next_batch() -> Result<()> {
    init_logger();
    let engine = CsvEngineBuilder::new().delimiter(";").batch_size(4).build()?;
    let csv = people_csv(10);
    let token = CancellationToken::new();

    let mut reader = engine
        .async_reader::<Person, _>(csv.as_bytes())?
        .with_cancellation(token.clone());

    assert_eq!(reader.next().await?, Some(Person::new("person-0", 0)));
    token.cancel();

    // the current batch is still handed out
    for index in 1..4 {
        assert_eq!(
            reader.next().await?.map(|p| p.name),
            Some(format!("person-{index}"))
        );
    }

    assert!(matches!(reader.next().await, Err(CsvError::Cancelled)));
    assert_eq!(reader.next().await?, None);
    Ok(())
}

#[tokio::test]
async fn cancelled_token_should_stop_before_the_first_batch() -> Result<()> {
    let engine = CsvEngine::default();
    let token = CancellationToken::new();
    token.cancel();

    let mut reader = engine
        .async_row_reader("a,b\n1,2\n".as_bytes())
        .with_cancellation(token);

    assert!(matches!(reader.next().await, Err(CsvError::Cancelled)));
    assert_eq!(reader.header(), ["a".to_string(), "b".to_string()]);
    Ok(())
}

#[tokio::test]
async fn typed_writer_without_records_should_write_an_empty_header() -> Result<()> {
    let engine = CsvEngineBuilder::new().delimiter(";").build()?;

    let mut writer = engine.async_writer::<Person, _>(Vec::<u8>::new())?;
    writer.write_all(&Vec::<Person>::new()).await?;

    assert_eq!(writer.into_inner().await?, b"\n");
    Ok(())
}

#[tokio::test]
async fn row_writer_without_rows_should_write_nothing() -> Result<()> {
    let engine = CsvEngine::default();

    let mut writer = engine.async_row_writer(Vec::<u8>::new());
    writer.write_all(&Vec::<Row>::new()).await?;

    assert!(writer.into_inner().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn readers_should_run_concurrently_on_one_engine() -> Result<()> {
    let engine = CsvEngineBuilder::new().delimiter(";").batch_size(5).build()?;

    let tasks: Vec<_> = (1..=4)
        .map(|factor| {
            let engine = engine.clone();
            tokio::spawn(async move {
                let csv = people_csv(factor * 10);
                engine.read_all_async::<Person, _>(csv.as_bytes()).await
            })
        })
        .collect();

    for (index, task) in tasks.into_iter().enumerate() {
        let people = task.await??;
        assert_eq!(people.len(), (index + 1) * 10);
    }
    Ok(())
}
