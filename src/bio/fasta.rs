use crate::bio::sequence::Sequence;
use crate::TerpenomeError;
use flate2::read::GzDecoder;
use memmap2::Mmap;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_till},
    character::complete::{line_ending, not_line_ending, one_of},
    combinator::{eof, map, opt},
    sequence::preceded,
    IResult,
};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

const LINE_WIDTH: usize = 80;

/// Parse a FASTA header line
fn parse_header(input: &[u8]) -> IResult<&[u8], (&str, Option<&str>)> {
    let (input, _) = tag(b">")(input)?;
    let (input, id) = map(
        take_till(|c: u8| c == b' ' || c == b'\t' || c == b'\n' || c == b'\r'),
        |s| std::str::from_utf8(s).unwrap_or(""),
    )(input)?;
    let (input, description) = opt(preceded(
        one_of(" \t"),
        map(not_line_ending, |s| std::str::from_utf8(s).unwrap_or("")),
    ))(input)?;
    let (input, _) = alt((line_ending, eof))(input)?;
    Ok((input, (id, description)))
}

/// Header line as read, without '>' and the line ending
fn header_text(input: &[u8]) -> IResult<&[u8], &[u8]> {
    preceded(tag(b">"), not_line_ending)(input)
}

/// Parse sequence lines until next header or EOF
fn parse_sequence(input: &[u8]) -> IResult<&[u8], Vec<u8>> {
    let mut sequence = Vec::new();
    let mut remaining = input;

    while !remaining.is_empty() && remaining[0] != b'>' {
        let (rest, line) =
            take_till::<_, _, nom::error::Error<_>>(|c: u8| c == b'\n' || c == b'\r')(remaining)?;
        let (rest, _) = opt(line_ending)(rest)?;

        // Gap characters are kept so aligned FASTA survives a round trip
        for &c in line {
            if !c.is_ascii_whitespace() {
                sequence.push(c.to_ascii_uppercase());
            }
        }

        remaining = rest;
    }

    Ok((remaining, sequence))
}

/// Parse a single FASTA record
fn parse_record(input: &[u8]) -> IResult<&[u8], Sequence> {
    let (_, raw_header) = header_text(input)?;
    let (input, (id, description)) = parse_header(input)?;
    let (input, sequence) = parse_sequence(input)?;

    let mut seq = Sequence::new(id.to_string(), sequence)
        .with_raw_header(String::from_utf8_lossy(raw_header).into_owned());
    if let Some(desc) = description {
        let desc = desc.trim();
        if !desc.is_empty() {
            seq = seq.with_description(desc.to_string());
        }
    }

    Ok((input, seq))
}

/// Parse FASTA from bytes
pub fn parse_fasta_from_bytes(data: &[u8]) -> Result<Vec<Sequence>, TerpenomeError> {
    let mut input = data;
    let mut sequences = Vec::new();

    while !input.is_empty() {
        // Skip empty lines and whitespace
        while !input.is_empty() && input[0].is_ascii_whitespace() {
            input = &input[1..];
        }

        if input.is_empty() {
            break;
        }

        if input[0] != b'>' {
            return Err(TerpenomeError::Parse(
                "Sequence data before first FASTA header".to_string(),
            ));
        }

        match parse_record(input) {
            Ok((remaining, seq)) => {
                if seq.is_empty() {
                    tracing::warn!("Skipping FASTA record '{}' without sequence", seq.id);
                } else {
                    sequences.push(seq);
                }
                input = remaining;
            }
            Err(e) => {
                return Err(TerpenomeError::Parse(format!("Failed to parse FASTA: {:?}", e)));
            }
        }
    }

    Ok(sequences)
}

/// Parse a FASTA file into sequences (supports .gz compression)
pub fn parse_fasta<P: AsRef<Path>>(path: P) -> Result<Vec<Sequence>, TerpenomeError> {
    let path = path.as_ref();

    let sequences = if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        parse_fasta_gzip(path)?
    } else {
        parse_fasta_uncompressed(path)?
    };

    tracing::debug!("Parsed {} sequences from {}", sequences.len(), path.display());
    Ok(sequences)
}

fn parse_fasta_uncompressed(path: &Path) -> Result<Vec<Sequence>, TerpenomeError> {
    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(Vec::new());
    }
    let mmap = unsafe { Mmap::map(&file)? };

    parse_fasta_from_bytes(&mmap[..])
}

fn parse_fasta_gzip(path: &Path) -> Result<Vec<Sequence>, TerpenomeError> {
    let file = File::open(path)?;
    let mut decoder = GzDecoder::new(BufReader::new(file));
    let mut buffer = Vec::new();
    decoder.read_to_end(&mut buffer)?;

    parse_fasta_from_bytes(&buffer)
}

/// Write sequences to a FASTA file (supports .gz compression)
pub fn write_fasta<P: AsRef<Path>>(path: P, sequences: &[Sequence]) -> Result<(), TerpenomeError> {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let path = path.as_ref();
    let file = File::create(path)?;

    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        let encoder = GzEncoder::new(file, Compression::default());
        let mut writer = BufWriter::new(encoder);
        write_fasta_to_writer(&mut writer, sequences)?;
        writer.flush()?;
    } else {
        let mut writer = BufWriter::new(file);
        write_fasta_to_writer(&mut writer, sequences)?;
        writer.flush()?;
    }

    Ok(())
}

/// Write sequences to any writer
pub fn write_fasta_to_writer<W: Write>(
    writer: &mut W,
    sequences: &[Sequence],
) -> Result<(), TerpenomeError> {
    for seq in sequences {
        writeln!(writer, "{}", seq.header())?;

        for chunk in seq.sequence.chunks(LINE_WIDTH) {
            writeln!(writer, "{}", String::from_utf8_lossy(chunk))?;
        }
    }
    Ok(())
}

/// Render sequences as FASTA text, e.g. for piping into a tool's stdin
pub fn to_fasta_string(sequences: &[Sequence]) -> String {
    let mut buffer = Vec::new();
    // Writing into a Vec cannot fail
    let _ = write_fasta_to_writer(&mut buffer, sequences);
    String::from_utf8_lossy(&buffer).to_string()
}
