#![cfg_attr(docsrs, feature(doc_cfg))]
//#![warn(missing_docs)]

/*!
 # batch-csv

 A batched, streaming reader and writer for delimited text. Lines are turned
 into typed records or generic rows and back, through a blocking (`std::io`)
 or an async (`tokio::io`) API sharing the same batching core.

 ## Core Concepts

- **CsvEngine:** The configured entry point. It holds the options and the header
  cache, and creates readers and writers.
- **CsvRecord:** A record type described by an ordered list of `FieldDescriptor`s,
  each with typed accessors and an optional column mapping.
- **Header cache:** The fields and column names of a record type, resolved once
  per engine and reused until `clear_caches` is called.
- **Batch:** Readers fetch up to `batch_size` lines at a time, then hand the
  resulting items out in input order. Async cancellation is observed between
  batches.
- **Row:** An ordered column name to optional value mapping, for reading and
  writing without a record type.

 ## Features

| **Feature**   | **Description**                                               |
|---------------|---------------------------------------------------------------|
| chrono        | Coercion of `chrono` dates and date-times                     |
| uuid          | Coercion of `uuid::Uuid`                                      |
| full          | Enables all available features                                |

 ## Limitations

 This is not an RFC 4180 parser: cells are split on the literal delimiter,
 quotes are not interpreted and nothing is escaped on output. Only `\n` and
 `\r\n` end a line; a lone `\r` does not.

 ## Getting Started

```rust
# use batch_csv::{CsvEngineBuilder, CsvResult, core::item::ItemReader};
# use batch_csv::record::{CsvRecord, FieldDescriptor};
#[derive(Debug, Default, PartialEq)]
struct Car {
    year: u16,
    make: String,
    model: String,
}

impl CsvRecord for Car {
    fn fields() -> CsvResult<Vec<FieldDescriptor<Self>>> {
        Ok(vec![
            FieldDescriptor::new("year", |c: &Car| &c.year, |c: &mut Car, v| c.year = v),
            FieldDescriptor::new("make", |c: &Car| &c.make, |c: &mut Car, v| c.make = v),
            FieldDescriptor::new("model", |c: &Car| &c.model, |c: &mut Car, v| c.model = v),
        ])
    }
}

fn main() -> CsvResult<()> {
    let csv = "year,make,model
1948,Porsche,356
1995,Peugeot,205
2021,Mazda,CX-30";

    let engine = CsvEngineBuilder::new().batch_size(2).build()?;

    let reader = engine.reader::<Car, _>(csv.as_bytes())?;
    let mut cars = Vec::new();
    while let Some(car) = reader.read()? {
        cars.push(car);
    }
    assert_eq!(cars.len(), 3);
    assert_eq!(cars[2].model, "CX-30");

    let output = engine.write_string(&cars)?;
    assert_eq!(output, format!("{csv}\n"));

    Ok(())
}
```

 ## License
 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.

 ## Contribution
 Unless you explicitly state otherwise, any contribution intentionally submitted
 for inclusion in the work by you, as defined in the Apache-2.0 license, shall be
 dual licensed as above, without any additional terms or conditions

 */

/// Core abstractions: item traits, batch buffer and configuration
pub mod core;

/// Engine and its builder
pub mod engine;

/// Error types for read and write operations
pub mod error;

/// Record descriptors, coercion, header cache and generic rows
pub mod record;

#[doc(inline)]
pub use error::*;

#[doc(inline)]
pub use engine::{CsvEngine, CsvEngineBuilder};

/// CSV item readers and writers
pub mod item;
