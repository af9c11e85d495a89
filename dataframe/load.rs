use super::*;
use fnv::FnvHashSet;
use std::{
	collections::BTreeMap,
	path::{Path, PathBuf},
};
use thiserror::Error;

/// An error raised while ingesting a csv file into a [`DataFrame`](struct.DataFrame.html).
#[derive(Debug, Error)]
pub enum IngestionError {
	#[error("failed to open {}", .path.display())]
	Open { path: PathBuf, source: csv::Error },
	#[error("failed to read csv data")]
	Csv(#[from] csv::Error),
	#[error("invalid utf-8 in column \"{column_name}\"")]
	InvalidUtf8 { column_name: String },
}

#[derive(Clone)]
pub struct FromCsvOptions {
	pub column_types: Option<BTreeMap<String, ColumnType>>,
	pub infer_options: InferOptions,
}

impl Default for FromCsvOptions {
	fn default() -> Self {
		Self {
			column_types: None,
			infer_options: InferOptions::default(),
		}
	}
}

#[derive(Clone, Debug)]
pub struct InferOptions {
	pub enum_max_unique_values: usize,
}

impl Default for InferOptions {
	fn default() -> Self {
		Self {
			enum_max_unique_values: 100,
		}
	}
}

/// These values load as missing.
const DEFAULT_INVALID_VALUES: &[&str] = &[
	"", "null", "NULL", "n/a", "N/A", "nan", "-nan", "NaN", "-NaN", "?",
];

impl DataFrame {
	pub fn from_path(
		path: &Path,
		options: FromCsvOptions,
		progress: impl Fn(u64),
	) -> Result<Self, IngestionError> {
		let mut reader = csv::Reader::from_path(path).map_err(|source| IngestionError::Open {
			path: path.to_owned(),
			source,
		})?;
		Self::from_csv(&mut reader, options, progress)
	}

	pub fn from_csv<R>(
		reader: &mut csv::Reader<R>,
		options: FromCsvOptions,
		progress: impl Fn(u64),
	) -> Result<Self, IngestionError>
	where
		R: std::io::Read + std::io::Seek,
	{
		let column_names: Vec<String> = reader
			.headers()?
			.into_iter()
			.map(|column_name| column_name.to_owned())
			.collect();
		let n_columns = column_names.len();
		let start_position = reader.position().clone();
		let infer_options = &options.infer_options;
		let mut n_rows = None;

		#[derive(Clone, Debug)]
		enum ColumnTypeOrInferStats<'a> {
			ColumnType(ColumnType),
			InferStats(InferStats<'a>),
		}

		// Retrieve any column types present in the options.
		let mut column_types: Vec<ColumnTypeOrInferStats> = if let Some(column_types) =
			options.column_types
		{
			column_names
				.iter()
				.map(|column_name| {
					column_types
						.get(column_name)
						.map(|column_type| ColumnTypeOrInferStats::ColumnType(column_type.clone()))
						.unwrap_or_else(|| {
							ColumnTypeOrInferStats::InferStats(InferStats::new(infer_options))
						})
				})
				.collect()
		} else {
			vec![ColumnTypeOrInferStats::InferStats(InferStats::new(infer_options)); n_columns]
		};

		// Passing over the csv to infer column types is only necessary if one or more columns did not have its type specified.
		let needs_infer =
			column_types.iter().any(
				|column_type_or_infer_stats| match column_type_or_infer_stats {
					ColumnTypeOrInferStats::ColumnType(_) => false,
					ColumnTypeOrInferStats::InferStats(_) => true,
				},
			);

		// If the infer pass is necessary, pass over the dataset and infer the types for those columns whose types were not specified.
		let column_types: Vec<ColumnType> = if needs_infer {
			let mut infer_stats: Vec<(usize, &mut InferStats)> = column_types
				.iter_mut()
				.enumerate()
				.filter_map(
					|(index, column_type_or_infer_stats)| match column_type_or_infer_stats {
						ColumnTypeOrInferStats::ColumnType(_) => None,
						ColumnTypeOrInferStats::InferStats(infer_stats) => {
							Some((index, infer_stats))
						}
					},
				)
				.collect();
			let mut record = csv::StringRecord::new();
			let mut n_rows_computed = 0;
			while reader.read_record(&mut record)? {
				n_rows_computed += 1;
				for (index, infer_stats) in infer_stats.iter_mut() {
					let value = record.get(*index).unwrap();
					infer_stats.update(value);
				}
			}
			n_rows = Some(n_rows_computed);
			let column_types = column_types
				.into_iter()
				.map(
					|column_type_or_infer_stats| match column_type_or_infer_stats {
						ColumnTypeOrInferStats::ColumnType(column_type) => column_type,
						ColumnTypeOrInferStats::InferStats(infer_stats) => infer_stats.finalize(),
					},
				)
				.collect();
			// After inference, return back to the beginning of the csv to load the values.
			reader.seek(start_position)?;
			column_types
		} else {
			column_types
				.into_iter()
				.map(
					|column_type_or_infer_stats| match column_type_or_infer_stats {
						ColumnTypeOrInferStats::ColumnType(column_type) => column_type,
						_ => unreachable!(),
					},
				)
				.collect()
		};

		// Create the dataframe and reserve storage for the values if an inference pass counted the rows.
		let mut dataframe = Self::new(column_names, column_types);
		if let Some(n_rows) = n_rows {
			for column in dataframe.columns.iter_mut() {
				match column {
					Column::Unknown(_) => {}
					Column::Number(column) => column.data.reserve_exact(n_rows),
					Column::Enum(column) => column.data.reserve_exact(n_rows),
					Column::Text(column) => column.data.reserve_exact(n_rows),
				}
			}
		}
		// Read each csv record and insert the values into the columns of the dataframe.
		let mut record = csv::ByteRecord::new();
		while reader.read_byte_record(&mut record)? {
			progress(record.position().unwrap().byte());
			for (column, value) in dataframe.columns.iter_mut().zip(record.iter()) {
				match column {
					Column::Unknown(column) => {
						column.len += 1;
					}
					Column::Number(column) => {
						let value = match lexical::parse::<f32, _>(value) {
							Ok(value) if value.is_finite() => value,
							_ => f32::NAN,
						};
						column.data.push(value);
					}
					Column::Enum(column) => {
						let value = std::str::from_utf8(value)
							.ok()
							.and_then(|value| {
								column.options.iter().position(|option| option == value)
							})
							.map(|position| NonZeroUsize::new(position + 1).unwrap());
						column.data.push(value);
					}
					Column::Text(column) => {
						let value = std::str::from_utf8(value).map_err(|_| {
							IngestionError::InvalidUtf8 {
								column_name: column.name.clone(),
							}
						})?;
						column.data.push(value.to_owned());
					}
				}
			}
		}
		Ok(dataframe)
	}
}

#[derive(Clone, Debug)]
pub struct InferStats<'a> {
	infer_options: &'a InferOptions,
	column_type: InferColumnType,
	unique_values: Option<UniqueValues>,
}

/// The distinct values seen so far, in first-seen order. The order is what makes one-hot column order reproducible downstream.
#[derive(Clone, Debug, Default)]
struct UniqueValues {
	ordered: Vec<String>,
	set: FnvHashSet<String>,
}

impl UniqueValues {
	fn insert(&mut self, value: &str) {
		if !self.set.contains(value) {
			self.set.insert(value.to_owned());
			self.ordered.push(value.to_owned());
		}
	}

	fn len(&self) -> usize {
		self.ordered.len()
	}
}

#[derive(PartialEq, Clone, Copy, Debug)]
enum InferColumnType {
	Unknown,
	Number,
	Enum,
	Text,
}

impl<'a> InferStats<'a> {
	pub fn new(infer_options: &'a InferOptions) -> Self {
		Self {
			infer_options,
			column_type: InferColumnType::Unknown,
			unique_values: Some(UniqueValues::default()),
		}
	}

	pub fn update(&mut self, value: &str) {
		if DEFAULT_INVALID_VALUES.contains(&value) {
			return;
		}
		if let Some(unique_values) = self.unique_values.as_mut() {
			unique_values.insert(value);
			if unique_values.len() > self.infer_options.enum_max_unique_values {
				self.unique_values = None;
			}
		}
		match self.column_type {
			InferColumnType::Unknown | InferColumnType::Number => {
				if lexical::parse::<f32, _>(value)
					.map(|value: f32| value.is_finite())
					.unwrap_or(false)
				{
					self.column_type = InferColumnType::Number;
				} else if self.unique_values.is_some() {
					self.column_type = InferColumnType::Enum;
				} else {
					self.column_type = InferColumnType::Text;
				}
			}
			InferColumnType::Enum => {
				if self.unique_values.is_none() {
					self.column_type = InferColumnType::Text;
				}
			}
			_ => {}
		}
	}

	pub fn finalize(self) -> ColumnType {
		match self.column_type {
			InferColumnType::Unknown => ColumnType::Unknown,
			InferColumnType::Number => {
				// A number column whose distinct values are exactly zero and one holds a binary label, so load it as an enum.
				if let Some(unique_values) = &self.unique_values {
					if unique_values.len() == 2
						&& unique_values.set.contains("0")
						&& unique_values.set.contains("1")
					{
						return ColumnType::Enum {
							options: vec!["0".to_owned(), "1".to_owned()],
						};
					}
				}
				ColumnType::Number
			}
			InferColumnType::Enum => ColumnType::Enum {
				options: self.unique_values.unwrap().ordered,
			},
			InferColumnType::Text => ColumnType::Text,
		}
	}
}

#[test]
fn test_infer() {
	let csv = r#"age,sex,name
29,female,Allen
2,male,Allison
30,male,Rice
"#;
	let df = DataFrame::from_csv(
		&mut csv::Reader::from_reader(std::io::Cursor::new(csv)),
		FromCsvOptions {
			column_types: None,
			infer_options: InferOptions {
				enum_max_unique_values: 2,
			},
		},
		|_| {},
	)
	.unwrap();
	insta::assert_debug_snapshot!(df, @r###"
	DataFrame {
	    columns: [
	        Number(
	            NumberColumn {
	                name: "age",
	                data: [
	                    29.0,
	                    2.0,
	                    30.0,
	                ],
	            },
	        ),
	        Enum(
	            EnumColumn {
	                name: "sex",
	                options: [
	                    "female",
	                    "male",
	                ],
	                data: [
	                    Some(
	                        1,
	                    ),
	                    Some(
	                        2,
	                    ),
	                    Some(
	                        2,
	                    ),
	                ],
	            },
	        ),
	        Text(
	            TextColumn {
	                name: "name",
	                data: [
	                    "Allen",
	                    "Allison",
	                    "Rice",
	                ],
	            },
	        ),
	    ],
	}
	"###);
}

#[test]
fn test_column_types() {
	let csv = r#"age,name,embarked
29,Allen,S
2,Allison,C
"#;
	let mut column_types = BTreeMap::new();
	column_types.insert("name".to_owned(), ColumnType::Text);
	column_types.insert(
		"embarked".to_owned(),
		ColumnType::Enum {
			options: vec!["C".to_owned(), "Q".to_owned(), "S".to_owned()],
		},
	);
	let df = DataFrame::from_csv(
		&mut csv::Reader::from_reader(std::io::Cursor::new(csv)),
		FromCsvOptions {
			column_types: Some(column_types),
			infer_options: InferOptions::default(),
		},
		|_| {},
	)
	.unwrap();
	insta::assert_debug_snapshot!(df, @r###"
	DataFrame {
	    columns: [
	        Number(
	            NumberColumn {
	                name: "age",
	                data: [
	                    29.0,
	                    2.0,
	                ],
	            },
	        ),
	        Text(
	            TextColumn {
	                name: "name",
	                data: [
	                    "Allen",
	                    "Allison",
	                ],
	            },
	        ),
	        Enum(
	            EnumColumn {
	                name: "embarked",
	                options: [
	                    "C",
	                    "Q",
	                    "S",
	                ],
	                data: [
	                    Some(
	                        3,
	                    ),
	                    Some(
	                        1,
	                    ),
	                ],
	            },
	        ),
	    ],
	}
	"###);
}

#[test]
fn test_enum_options_are_first_seen_order() {
	let csv = "embarked\nS\nC\nS\nQ\n";
	let df = DataFrame::from_csv(
		&mut csv::Reader::from_reader(std::io::Cursor::new(csv)),
		FromCsvOptions::default(),
		|_| {},
	)
	.unwrap();
	let column = df.columns[0].as_enum().unwrap();
	assert_eq!(column.options, vec!["S", "C", "Q"]);
}

#[test]
fn test_invalid_values_load_as_missing() {
	let csv = "age,embarked\n29,S\n,C\n?,\n";
	let df = DataFrame::from_csv(
		&mut csv::Reader::from_reader(std::io::Cursor::new(csv)),
		FromCsvOptions::default(),
		|_| {},
	)
	.unwrap();
	let age = df.columns[0].as_number().unwrap();
	assert_eq!(age.data[0], 29.0);
	assert!(age.data[1].is_nan());
	assert!(age.data[2].is_nan());
	let embarked = df.columns[1].as_enum().unwrap();
	assert_eq!(embarked.options, vec!["S", "C"]);
	assert_eq!(embarked.data[2], None);
}

#[test]
fn test_zero_one_column_becomes_enum() {
	let csv = "survived\n0\n1\n1\n0\n";
	let df = DataFrame::from_csv(
		&mut csv::Reader::from_reader(std::io::Cursor::new(csv)),
		FromCsvOptions::default(),
		|_| {},
	)
	.unwrap();
	let column = df.columns[0].as_enum().unwrap();
	assert_eq!(column.options, vec!["0", "1"]);
	assert_eq!(
		column.data,
		vec![
			NonZeroUsize::new(1),
			NonZeroUsize::new(2),
			NonZeroUsize::new(2),
			NonZeroUsize::new(1),
		]
	);
}

#[test]
fn test_unequal_row_lengths_fail() {
	let csv = "age,fare\n29,7.25\n30\n";
	let result = DataFrame::from_csv(
		&mut csv::Reader::from_reader(std::io::Cursor::new(csv)),
		FromCsvOptions::default(),
		|_| {},
	);
	assert!(matches!(result, Err(IngestionError::Csv(_))));
}
