//! CSV to KMZ conversion pipeline.
//!
//! A conversion reads the header row once, then streams every data row into
//! the KML document entry of a zip archive. Marker images, one per palette
//! colour, follow the document. All per-run state (the category table)
//! lives inside a single `convert` call, so one `Converter` can serve any
//! number of independent conversions, including concurrent ones.

mod archive;
mod assign;
mod header;
mod kml;

pub use archive::{ArchiveBuilder, DOCUMENT_NAME};
pub use assign::{CategoryColours, Swatch};
pub use header::{ColumnIndex, HeaderLabels, RequiredField};
pub use kml::{image_name, style_id, KmlWriter, Placemark};

use std::io::{Read, Seek, Write};

use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;

use crate::error::{ConvertError, Result};
use crate::render::MarkerIcon;
use crate::types::{Coordinate, Palette};

/// Default document and folder name.
pub const DEFAULT_NAME: &str = "Les arbres";

/// Input and document settings for a conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Field delimiter byte
    pub delimiter: u8,
    /// Header labels for the required columns
    pub labels: HeaderLabels,
    /// Name given to the KML document and its folder
    pub name: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            labels: HeaderLabels::default(),
            name: DEFAULT_NAME.to_string(),
        }
    }
}

/// Counts reported by a finished conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConvertSummary {
    /// Data rows read, excluding the header
    pub rows: u64,
    /// Placemarks written
    pub placemarks: usize,
    /// Rows dropped for an unusable coordinate field
    pub skipped: u64,
    /// Distinct categories seen
    pub categories: usize,
    /// Marker images written
    pub markers: usize,
}

/// Converts tree survey tables into KMZ archives.
#[derive(Debug, Clone)]
pub struct Converter {
    palette: Palette,
    icon: MarkerIcon,
    options: ConvertOptions,
}

impl Converter {
    pub fn new(palette: Palette, icon: MarkerIcon) -> Self {
        Self {
            palette,
            icon,
            options: ConvertOptions::default(),
        }
    }

    /// Converter with the built-in palette and marker.
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(Palette::default_palette(), MarkerIcon::builtin()?))
    }

    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert a delimited table into a KMZ archive written to `output`.
    ///
    /// The header is resolved before anything is written. Rows whose
    /// coordinate field is not a `lat,lon` pair are skipped; a row too short
    /// for a required column aborts the run. On error the bytes already
    /// written to `output` do not form a valid archive.
    pub fn convert<R: Read, W: Write + Seek>(&self, input: R, output: W) -> Result<ConvertSummary> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.options.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(input);

        let mut record = StringRecord::new();
        let columns = read_header(&mut reader, &mut record, &self.options.labels)?;
        let (widest_field, widest) = columns.widest();
        let common_name_label = self.options.labels.label(RequiredField::CommonName);

        let mut summary = ConvertSummary::default();
        let mut colours = CategoryColours::new(&self.palette);
        let mut archive = ArchiveBuilder::new(output);

        let mut kml = KmlWriter::begin(archive.document()?, &self.options.name)?;
        while reader.read_record(&mut record)? {
            summary.rows += 1;
            let line = record.position().map_or(summary.rows + 1, |p| p.line());

            if record.len() <= widest {
                return Err(ConvertError::RowTooShort {
                    line,
                    width: record.len(),
                    column: widest,
                    label: self.options.labels.label(widest_field).to_string(),
                });
            }

            let Some(coordinate) = Coordinate::parse(&record[columns.coordinates]) else {
                tracing::debug!(line, field = &record[columns.coordinates], "skipping row without coordinates");
                summary.skipped += 1;
                continue;
            };

            let name = &record[columns.scientific_name];
            let swatch = colours.assign(name);
            kml.placemark(&Placemark {
                name,
                style: swatch.index,
                stage: &record[columns.stage],
                common_name_label,
                common_name: &record[columns.common_name],
                variety: &record[columns.variety],
                coordinate,
            })?;
        }
        let (_, placemarks) = kml.finish(self.palette.len())?;

        archive.markers(&self.icon, &self.palette)?;
        archive.finish()?;

        summary.placemarks = placemarks;
        summary.categories = colours.len();
        summary.markers = self.palette.len();

        tracing::info!(
            rows = summary.rows,
            placemarks = summary.placemarks,
            skipped = summary.skipped,
            categories = summary.categories,
            "conversion finished"
        );

        Ok(summary)
    }
}

/// Read the first record and resolve the required columns from it.
///
/// An input with no rows at all is missing every label.
pub(crate) fn read_header<R: Read>(
    reader: &mut csv::Reader<R>,
    record: &mut StringRecord,
    labels: &HeaderLabels,
) -> Result<ColumnIndex> {
    if !reader.read_record(record)? {
        return Err(ConvertError::Schema {
            missing: RequiredField::ALL
                .iter()
                .map(|&field| labels.label(field).to_string())
                .collect(),
        });
    }
    ColumnIndex::resolve(record.iter(), labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use image::{ImageBuffer, Rgba};
    use pretty_assertions::assert_eq;
    use zip::ZipArchive;

    use crate::types::Colour;

    const HEADER: &str = "俗名;Nom scientifique;VARIETE OUCULTIVAR;STADE DE DEVELOPPEMENT;geo_point_2d\n";

    fn converter() -> Converter {
        Converter::builtin().unwrap()
    }

    fn run(converter: &Converter, input: &str) -> Result<(ConvertSummary, Vec<u8>)> {
        let mut out = Cursor::new(Vec::new());
        let summary = converter.convert(input.as_bytes(), &mut out)?;
        Ok((summary, out.into_inner()))
    }

    fn read_doc(bytes: &[u8]) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut doc = String::new();
        archive
            .by_name(DOCUMENT_NAME)
            .unwrap()
            .read_to_string(&mut doc)
            .unwrap();
        doc
    }

    fn entry_names(bytes: &[u8]) -> Vec<String> {
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        names
    }

    #[test]
    fn test_single_row_end_to_end() {
        let input = format!(
            "{HEADER}\"Cerisier\";\"Prunus serrulata\";\"Kanzan\";\"Adulte\";\"48.85,2.35\"\n"
        );
        let (summary, bytes) = run(&converter(), &input).unwrap();

        assert_eq!(summary.rows, 1);
        assert_eq!(summary.placemarks, 1);
        assert_eq!(summary.categories, 1);

        let doc = read_doc(&bytes);
        assert_eq!(doc.matches("<Placemark>").count(), 1);
        assert!(doc.contains("<Placemark><name>Prunus serrulata</name><styleUrl>#flower-style-0</styleUrl>"));
        assert!(doc.contains("<p>stade : Adulte</p><p>俗名 : Cerisier</p><p>var. Kanzan</p>"));
        assert!(doc.contains("<coordinates>2.35, 48.85</coordinates>"));
    }

    #[test]
    fn test_zero_rows_still_writes_everything() {
        let (summary, bytes) = run(&converter(), HEADER).unwrap();
        assert_eq!(summary, ConvertSummary { markers: 4, ..Default::default() });

        assert_eq!(
            entry_names(&bytes),
            vec![
                "doc.kml",
                "images/flower-0.png",
                "images/flower-1.png",
                "images/flower-2.png",
                "images/flower-3.png",
            ]
        );

        let doc = read_doc(&bytes);
        assert!(!doc.contains("<Placemark>"));
        assert_eq!(doc.matches("<Style id=").count(), 4);
        assert!(doc.trim_end().ends_with("</kml>"));
    }

    #[test]
    fn test_malformed_coordinates_are_skipped() {
        let input = format!(
            "{HEADER}\
             Tilleul;Tilia;;Jeune;48.8\n\
             Platane;Platanus;;Adulte;\"48.8,2.3,0\"\n\
             Erable;Acer;;Adulte;\n\
             Chêne;Quercus;;Mature;\"48.8,2.3\"\n"
        );
        let (summary, bytes) = run(&converter(), &input).unwrap();

        assert_eq!(summary.rows, 4);
        assert_eq!(summary.skipped, 3);
        assert_eq!(summary.placemarks, 1);
        // Skipped rows never claim a colour
        assert_eq!(summary.categories, 1);

        let doc = read_doc(&bytes);
        assert!(doc.contains("<name>Quercus</name><styleUrl>#flower-style-0</styleUrl>"));
        assert!(doc.contains("<coordinates>2.3, 48.8</coordinates>"));
    }

    #[test]
    fn test_categories_share_and_cycle_styles() {
        let mut input = HEADER.to_string();
        for name in ["A", "B", "A", "C", "D", "E", "B"] {
            input.push_str(&format!("x;{name};v;s;\"1,2\"\n"));
        }
        let (summary, bytes) = run(&converter(), &input).unwrap();
        assert_eq!(summary.categories, 5);

        let doc = read_doc(&bytes);
        let styles: Vec<&str> = doc
            .match_indices("<styleUrl>#flower-style-")
            .map(|(i, m)| &doc[i + m.len()..i + m.len() + 1])
            .collect();
        assert_eq!(styles, vec!["0", "1", "0", "2", "3", "0", "1"]);
    }

    #[test]
    fn test_conversion_is_reproducible() {
        let mut input = HEADER.to_string();
        for (i, name) in ["Tilia", "Acer", "Tilia", "Fagus", "Pinus", "Ulmus"].iter().enumerate() {
            input.push_str(&format!("c{i};{name};v;s;\"4{i}.0,2.{i}\"\n"));
        }
        let converter = converter();
        let (_, first) = run(&converter, &input).unwrap();
        let (_, second) = run(&converter, &input).unwrap();
        assert_eq!(read_doc(&first), read_doc(&second));
    }

    #[test]
    fn test_missing_labels_fail_before_output() {
        let input = "俗名;Nom scientifique;geo_point_2d\nx;y;\"1,2\"\n";
        let mut out = Cursor::new(Vec::new());
        let err = converter().convert(input.as_bytes(), &mut out).unwrap_err();

        match err {
            ConvertError::Schema { missing } => {
                assert_eq!(missing, vec!["VARIETE OUCULTIVAR", "STADE DE DEVELOPPEMENT"])
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(out.into_inner().is_empty());
    }

    #[test]
    fn test_empty_input_is_schema_error() {
        let err = run(&converter(), "").unwrap_err();
        assert!(matches!(err, ConvertError::Schema { ref missing } if missing.len() == 5));
    }

    #[test]
    fn test_short_row_is_fatal() {
        let input = format!("{HEADER}a;b;c;d;\"1,2\"\na;b;c\n");
        let err = run(&converter(), &input).unwrap_err();
        assert!(err.is_schema());
        match err {
            ConvertError::RowTooShort { line, width, column, label } => {
                assert_eq!(line, 3);
                assert_eq!(width, 3);
                assert_eq!(column, 4);
                assert_eq!(label, "geo_point_2d");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_custom_delimiter_and_name() {
        let options = ConvertOptions {
            delimiter: b'\t',
            name: "Street trees".to_string(),
            ..Default::default()
        };
        let converter = converter().with_options(options);
        let input = "geo_point_2d\tNom scientifique\t俗名\tVARIETE OUCULTIVAR\tSTADE DE DEVELOPPEMENT\n\
                     45.1,5.7\tBetula\tBouleau\t\tJeune\n";
        let (summary, bytes) = run(&converter, input).unwrap();
        assert_eq!(summary.placemarks, 1);

        let doc = read_doc(&bytes);
        assert!(doc.contains("<name>Street trees</name>"));
        assert!(doc.contains("<name>Betula</name>"));
        assert!(doc.contains("<coordinates>5.7, 45.1</coordinates>"));
    }

    #[test]
    fn test_markers_follow_palette() {
        let paint = Colour::rgb(226, 76, 75);
        let palette = Palette::new(vec![Colour::rgb(10, 20, 30), Colour::rgb(40, 50, 60)], paint).unwrap();
        let mut icon = ImageBuffer::from_pixel(2, 1, Rgba([0, 0, 0, 0]));
        icon.put_pixel(0, 0, Rgba(paint.to_rgba()));
        let converter = Converter::new(palette, MarkerIcon::from_image(icon));

        let (summary, bytes) = run(&converter, HEADER).unwrap();
        assert_eq!(summary.markers, 2);

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        for (index, expected) in [[10, 20, 30, 255], [40, 50, 60, 255]].iter().enumerate() {
            let mut png = Vec::new();
            archive
                .by_name(&image_name(index))
                .unwrap()
                .read_to_end(&mut png)
                .unwrap();
            let marker = image::load_from_memory(&png).unwrap().to_rgba8();
            assert_eq!(&marker.get_pixel(0, 0).0, expected);
            assert_eq!(marker.get_pixel(1, 0).0, [0, 0, 0, 0]);
        }
    }

    /// Fails every write once `fail` says so.
    struct FailingWriter {
        inner: Cursor<Vec<u8>>,
        fail: fn(&[u8]) -> bool,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if (self.fail)(buf) {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
            }
            self.inner.write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.inner.flush()
        }
    }

    impl Seek for FailingWriter {
        fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
            self.inner.seek(pos)
        }
    }

    fn failing(fail: fn(&[u8]) -> bool) -> FailingWriter {
        FailingWriter {
            inner: Cursor::new(Vec::new()),
            fail,
        }
    }

    #[test]
    fn test_archive_write_failure_is_fatal() {
        let input = format!("{HEADER}a;b;c;d;\"1,2\"\n");
        let err = converter()
            .convert(input.as_bytes(), failing(|_| true))
            .unwrap_err();
        assert!(matches!(err, ConvertError::Archive(_)), "unexpected error: {err:?}");
    }

    #[test]
    fn test_marker_write_failure_is_encode_error() {
        // Only the PNG signature write fails, so the document entry goes through
        let out = failing(|buf| buf.windows(4).any(|w| w == b"\x89PNG"));
        let input = format!("{HEADER}a;b;c;d;\"1,2\"\n");
        let err = converter().convert(input.as_bytes(), out).unwrap_err();

        match err {
            ConvertError::ImageEncode { name, .. } => assert_eq!(name, "images/flower-0.png"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_sample_document_snapshot() {
        let input = format!(
            "{HEADER}\
             \"Cerisier\";\"Prunus serrulata\";\"Kanzan\";\"Adulte\";\"48.85,2.35\"\n\
             \"Tilleul\";\"Tilia cordata\";\"\";\"Jeune (arbre)\";\"48.86,2.34\"\n\
             \"Cerisier\";\"Prunus serrulata\";\"Amanogawa\";\"Adulte\";\"48.87,2.33\"\n"
        );
        let (_, bytes) = run(&converter(), &input).unwrap();
        insta::assert_snapshot!("sample_document", read_doc(&bytes));
    }
}
