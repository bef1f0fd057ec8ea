//! RSS 2.0 serialization of the transformed feed.

use crate::feed::names::{product, rss, shipping, GOOGLE_NS, GOOGLE_PREFIX};
use crate::feed::{OutputFeed, OutputItem, ShippingBlock};
use crate::transform::price::format_nok;
use anyhow::Result;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// Serializes the feed as an indented RSS 2.0 document declaring the Google namespace.
///
/// The output holds no volatile data, so identical input yields identical bytes.
pub fn render_feed(feed: &OutputFeed) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let namespace_attr = format!("xmlns:{}", GOOGLE_PREFIX);
    let mut root = BytesStart::new(rss::ROOT);
    root.push_attribute(("version", rss::VERSION));
    root.push_attribute((namespace_attr.as_str(), GOOGLE_NS));
    writer.write_event(Event::Start(root))?;
    writer.write_event(Event::Start(BytesStart::new(rss::CHANNEL)))?;

    for (name, text) in feed.channel.entries() {
        write_text(&mut writer, name, text)?;
    }

    for item in &feed.items {
        write_item(&mut writer, item)?;
    }

    writer.write_event(Event::End(BytesEnd::new(rss::CHANNEL)))?;
    writer.write_event(Event::End(BytesEnd::new(rss::ROOT)))?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

fn google(name: &str) -> String {
    format!("{}:{}", GOOGLE_PREFIX, name)
}

fn write_text<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_google_text<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    write_text(writer, &google(name), text)
}

fn write_item<W: Write>(writer: &mut Writer<W>, item: &OutputItem) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(rss::ITEM)))?;

    write_google_text(writer, product::ID, &item.id)?;
    write_google_text(writer, product::TITLE, &item.title)?;
    write_google_text(writer, product::DESCRIPTION, &item.description)?;
    write_google_text(writer, product::LINK, &item.link)?;
    write_google_text(writer, product::IMAGE_LINK, &item.image_link)?;
    write_google_text(writer, product::AVAILABILITY, &item.availability)?;
    write_google_text(writer, product::PRODUCT_TYPE, &item.product_type)?;
    write_google_text(writer, product::GOOGLE_PRODUCT_CATEGORY, &item.google_product_category)?;
    write_google_text(writer, product::PRICE, &format_nok(item.price))?;
    write_shipping(writer, &item.shipping)?;

    writer.write_event(Event::End(BytesEnd::new(rss::ITEM)))?;
    Ok(())
}

fn write_shipping<W: Write>(writer: &mut Writer<W>, block: &ShippingBlock) -> Result<()> {
    let name = google(shipping::BLOCK);
    writer.write_event(Event::Start(BytesStart::new(name.as_str())))?;

    write_google_text(writer, shipping::COUNTRY, &block.country)?;
    write_google_text(writer, shipping::SERVICE, &block.service)?;
    write_google_text(writer, shipping::PRICE, &format_nok(block.price))?;
    write_google_text(writer, shipping::MIN_HANDLING_TIME, &block.min_handling_time.to_string())?;
    write_google_text(writer, shipping::MAX_HANDLING_TIME, &block.max_handling_time.to_string())?;
    write_google_text(writer, shipping::MIN_TRANSIT_TIME, &block.min_transit_time.to_string())?;
    write_google_text(writer, shipping::MAX_TRANSIT_TIME, &block.max_transit_time.to_string())?;

    writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{parse_feed, ChannelMeta};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_item(id: &str, price: &str, shipping: &str) -> OutputItem {
        OutputItem {
            id: id.to_string(),
            title: "Lampa & skärm".to_string(),
            description: "<p>Ljus</p>".to_string(),
            link: "https://www.lampster.se/p/1?a=1&b=2".to_string(),
            image_link: "N/A".to_string(),
            availability: "in stock".to_string(),
            product_type: "Norsk > Taklampor".to_string(),
            google_product_category: "N/A".to_string(),
            price: dec(price),
            shipping: ShippingBlock::norway(dec(shipping)),
        }
    }

    fn make_feed(items: Vec<OutputItem>) -> OutputFeed {
        OutputFeed {
            channel: ChannelMeta {
                title: Some("Lampster".to_string()),
                link: Some("https://www.lampster.se".to_string()),
                description: None,
            },
            items,
        }
    }

    fn render_string(feed: &OutputFeed) -> String {
        String::from_utf8(render_feed(feed).unwrap()).unwrap()
    }

    #[test]
    fn test_declaration_and_namespace() {
        let xml = render_string(&make_feed(Vec::new()));
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<rss version="2.0" xmlns:g="http://base.google.com/ns/1.0">"#));
        assert!(xml.ends_with("</rss>\n"));
    }

    #[test]
    fn test_empty_feed_has_channel() {
        let xml = render_string(&make_feed(Vec::new()));
        assert!(xml.contains("<channel>"));
        assert!(xml.contains("<title>Lampster</title>"));
        assert!(!xml.contains("<description>"));
        assert!(!xml.contains("<item>"));
    }

    #[test]
    fn test_item_fields_and_shipping() {
        let xml = render_string(&make_feed(vec![make_item("L-1", "133.75", "132.41")]));

        assert!(xml.contains("<g:id>L-1</g:id>"));
        assert!(xml.contains("<g:price>133.75 NOK</g:price>"));
        assert!(xml.contains("<g:country>NO</g:country>"));
        assert!(xml.contains("<g:service>Standard</g:service>"));
        assert!(xml.contains("<g:price>132.41 NOK</g:price>"));
        assert!(xml.contains("<g:min_handling_time>0</g:min_handling_time>"));
        assert!(xml.contains("<g:max_handling_time>1</g:max_handling_time>"));
        assert!(xml.contains("<g:min_transit_time>1</g:min_transit_time>"));
        assert!(xml.contains("<g:max_transit_time>9</g:max_transit_time>"));
        assert!(xml.contains("<g:image_link>N/A</g:image_link>"));
    }

    #[test]
    fn test_free_shipping_rendered_with_two_decimals() {
        let xml = render_string(&make_feed(vec![make_item("L-1", "800", "0")]));
        assert!(xml.contains("<g:price>800.00 NOK</g:price>"));
        assert!(xml.contains("<g:price>0.00 NOK</g:price>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = render_string(&make_feed(vec![make_item("L-1", "1", "0")]));
        assert!(xml.contains("<g:title>Lampa &amp; skärm</g:title>"));
        assert!(xml.contains("<g:description>&lt;p&gt;Ljus&lt;/p&gt;</g:description>"));
        assert!(xml.contains("?a=1&amp;b=2"));
    }

    #[test]
    fn test_output_is_well_formed_and_reparses() {
        let feed = make_feed(vec![make_item("L-1", "133.75", "132.41"), make_item("L-2", "2", "0")]);
        let xml = render_string(&feed);

        let reparsed = parse_feed(&xml).unwrap();
        assert_eq!(reparsed.count(), 2);
        assert_eq!(reparsed.channel.title.as_deref(), Some("Lampster"));

        let first = &reparsed.items[0];
        assert_eq!(first.id.as_deref(), Some("L-1"));
        assert_eq!(first.title.as_deref(), Some("Lampa & skärm"));
        assert_eq!(first.price.as_deref(), Some("133.75 NOK"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let feed = make_feed(vec![make_item("L-1", "133.75", "132.41")]);
        assert_eq!(render_feed(&feed).unwrap(), render_feed(&feed).unwrap());
    }
}
