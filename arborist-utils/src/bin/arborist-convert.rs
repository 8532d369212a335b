use std::convert::TryFrom;
use std::io::{BufReader, Write};

use clap::{App, AppSettings, Arg};
use conllx::io::{WriteSentence, Writer};
use failure::Error;
use stdinout::{Input, OrExit, Output};
use tracing::info;
use tracing_subscriber::EnvFilter;

use arborist::io::{PTBFormat, PTBWriter, ToConllx, WriteTree};
use arborist::{GoldReader, Sentence};

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let matches = build().get_matches();
    let out_format = matches.value_of(OUT_FORMAT).unwrap();
    let out_format = OutFormat::try_from(out_format).or_exit("Can't read output format.", 1);

    let in_path = matches.value_of(INPUT).map(ToOwned::to_owned);
    let input = Input::from(in_path);
    let reader = BufReader::new(input.buf_read().or_exit("Can't open input reader.", 1));
    let sentences = GoldReader::new()
        .read(reader)
        .or_exit("Can't read gold standard.", 1);
    info!("Read {} sentences", sentences.len());

    let out_path = matches.value_of(OUTPUT).map(ToOwned::to_owned);
    let output = Output::from(out_path);
    let writer = output.write().or_exit("Can't open output writer.", 1);

    let mut writer = get_writer(out_format, writer);
    for sentence in &sentences {
        writer
            .write(sentence)
            .or_exit("Can't write to output.", 1);
    }
}

trait WriteGold {
    fn write(&mut self, sentence: &Sentence) -> Result<(), Error>;
}

struct TreeWriter<W>(PTBWriter<W>)
where
    W: Write;

impl<W> WriteGold for TreeWriter<W>
where
    W: Write,
{
    fn write(&mut self, sentence: &Sentence) -> Result<(), Error> {
        self.0.write_tree(sentence.constituency_parse().tree())
    }
}

struct ConllxWriter<W>(Writer<W>)
where
    W: Write;

impl<W> WriteGold for ConllxWriter<W>
where
    W: Write,
{
    fn write(&mut self, sentence: &Sentence) -> Result<(), Error> {
        self.0.write_sentence(&sentence.to_conllx()?)
    }
}

#[derive(Copy, Clone)]
pub enum OutFormat {
    Conllx,
    Tree(PTBFormat),
}

impl<'a> TryFrom<&'a str> for OutFormat {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "conllx" => Ok(OutFormat::Conllx),
            _ => PTBFormat::try_from_str(value).map(OutFormat::Tree),
        }
    }
}

fn get_writer<'a, W>(out_format: OutFormat, writer: W) -> Box<dyn WriteGold + 'a>
where
    W: Write + 'a,
{
    match out_format {
        OutFormat::Conllx => Box::new(ConllxWriter(Writer::new(writer))),
        OutFormat::Tree(format) => Box::new(TreeWriter(PTBWriter::new(writer, format))),
    }
}

static DEFAULT_CLAP_SETTINGS: &[AppSettings] = &[
    AppSettings::DontCollapseArgsInUsage,
    AppSettings::UnifiedHelpMessage,
];

static INPUT: &str = "INPUT";
static OUTPUT: &str = "OUTPUT";
static OUT_FORMAT: &str = "OUT_FORMAT";

fn build<'a, 'b>() -> App<'a, 'b> {
    App::new("arborist-convert")
        .settings(DEFAULT_CLAP_SETTINGS)
        .version("0.1")
        .about("Convert a gold-standard corpus to trees or CoNLL-X.")
        .arg(
            Arg::with_name(INPUT)
                .long("input_file")
                .takes_value(true)
                .help("Gold-standard corpus, defaults to stdin"),
        )
        .arg(
            Arg::with_name(OUTPUT)
                .long("output_file")
                .takes_value(true)
                .help("Output file, defaults to stdout"),
        )
        .arg(
            Arg::with_name(OUT_FORMAT)
                .long("output_format")
                .takes_value(true)
                .possible_values(&["conllx", "ptb", "simple"])
                .default_value("simple")
                .help("Output format:"),
        )
}
