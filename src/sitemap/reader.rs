use quick_xml::events::Event;
use quick_xml::Reader;

/// Returns every `<loc>` of a `urlset` document, unescaped, in order
pub fn read_locations(xml: &str) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut locations = Vec::new();
    let mut in_url = false;
    let mut in_loc = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"url" => in_url = true,
                b"loc" if in_url => in_loc = true,
                _ => {}
            },
            Event::Text(e) if in_loc => {
                locations.push(e.unescape()?.trim().to_string());
            }
            Event::End(e) => match e.name().as_ref() {
                b"loc" => in_loc = false,
                b"url" => in_url = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(locations)
}
