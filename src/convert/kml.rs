//! KML document emission.
//!
//! The document is written strictly in order: header, placemarks, styles,
//! footer. Nothing already written is revisited, so the writer can stream
//! straight into an archive entry.

use std::io::Write;

use quick_xml::escape::partial_escape as escape;

use crate::error::Result;
use crate::types::Coordinate;

/// A single tree to place on the map.
#[derive(Debug, Clone, Copy)]
pub struct Placemark<'a> {
    pub name: &'a str,
    pub style: usize,
    pub stage: &'a str,
    pub common_name_label: &'a str,
    pub common_name: &'a str,
    pub variety: &'a str,
    pub coordinate: Coordinate<'a>,
}

/// Style identifier referenced by placemarks using palette entry `index`.
pub fn style_id(index: usize) -> String {
    format!("flower-style-{}", index)
}

/// Archive path of the marker image for palette entry `index`.
pub fn image_name(index: usize) -> String {
    format!("images/flower-{}.png", index)
}

/// Streaming writer for a point-only KML document.
pub struct KmlWriter<W: Write> {
    out: W,
    placemarks: usize,
}

impl<W: Write> KmlWriter<W> {
    /// Write the document header and open the named folder.
    pub fn begin(mut out: W, name: &str) -> Result<Self> {
        let name = escape(name);
        write!(
            out,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <kml xmlns=\"http://www.opengis.net/kml/2.2\">\n\
             <Document>\n\
             <name>{name}</name>\n\
             <description/>\n\
             <Folder>\n\
             <name>{name}</name>\n"
        )?;

        Ok(Self { out, placemarks: 0 })
    }

    /// Append one placemark.
    pub fn placemark(&mut self, placemark: &Placemark<'_>) -> Result<()> {
        // Escaped text never contains "]]>".
        write!(
            self.out,
            "<Placemark>\
             <name>{}</name>\
             <styleUrl>#{}</styleUrl>\
             <description><![CDATA[<p>stade : {}</p><p>{} : {}</p><p>var. {}</p>]]></description>\
             <Point><coordinates>{}</coordinates></Point>\
             </Placemark>\n",
            escape(placemark.name),
            style_id(placemark.style),
            escape(placemark.stage),
            escape(placemark.common_name_label),
            escape(placemark.common_name),
            escape(placemark.variety),
            placemark.coordinate,
        )?;
        self.placemarks += 1;
        Ok(())
    }

    /// Close the folder, write one style per palette entry and the footer.
    ///
    /// Returns the underlying writer and the number of placemarks written.
    pub fn finish(mut self, palette_len: usize) -> Result<(W, usize)> {
        self.out.write_all(b"</Folder>\n")?;

        for index in 0..palette_len {
            write!(
                self.out,
                "<Style id=\"{}\">\
                 <IconStyle><scale>1</scale><Icon><href>{}</href></Icon></IconStyle>\
                 <LabelStyle><scale>0</scale></LabelStyle>\
                 </Style>\n",
                style_id(index),
                image_name(index),
            )?;
        }

        self.out.write_all(b"</Document>\n</kml>\n")?;
        self.out.flush()?;
        Ok((self.out, self.placemarks))
    }
}
