//! XML parser for source product feeds.

use crate::error::FeedError;
use crate::feed::models::{ChannelMeta, SourceFeed, SourceItem};
use crate::feed::names::{product, rss, GOOGLE_NS};
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use tracing::{debug, trace};

/// A parsed element with its namespace resolved.
///
/// `text` holds only the character data that precedes the first child
/// element or comment, which is all a product field ever carries.
#[derive(Debug, Clone)]
struct Element {
    namespace: Option<String>,
    local: String,
    text: String,
    /// Set when a child or comment ends the leading text run
    text_closed: bool,
    children: Vec<Element>,
}

impl Element {
    fn new(namespace: Option<String>, local: &[u8]) -> Self {
        Self {
            namespace,
            local: String::from_utf8_lossy(local).into_owned(),
            text: String::new(),
            text_closed: false,
            children: Vec::new(),
        }
    }

    fn is_bare(&self, name: &str) -> bool {
        self.namespace.is_none() && self.local == name
    }

    fn is_google(&self, name: &str) -> bool {
        self.namespace.as_deref() == Some(GOOGLE_NS) && self.local == name
    }

    fn push_text(&mut self, text: &str) {
        if !self.text_closed {
            self.text.push_str(text);
        }
    }

    fn trimmed_text(&self) -> Option<&str> {
        let text = self.text.trim();
        (!text.is_empty()).then_some(text)
    }

    /// Looks up a product field on this element.
    ///
    /// Tries the `g:`-namespaced child first, then the bare child, then any
    /// child whose local name ends with `name`. The first candidate with
    /// non-blank text wins.
    fn child_text(&self, name: &str) -> Option<&str> {
        if let Some(text) =
            self.children.iter().find(|c| c.is_google(name)).and_then(Element::trimmed_text)
        {
            return Some(text);
        }

        if let Some(text) =
            self.children.iter().find(|c| c.is_bare(name)).and_then(Element::trimmed_text)
        {
            return Some(text);
        }

        self.children
            .iter()
            .filter(|c| c.local.ends_with(name))
            .find_map(Element::trimmed_text)
    }

    fn child_text_owned(&self, name: &str) -> Option<String> {
        self.child_text(name).map(str::to_string)
    }
}

fn namespace_of(resolved: ResolveResult<'_>) -> Option<String> {
    match resolved {
        ResolveResult::Bound(Namespace(uri)) => Some(String::from_utf8_lossy(uri).into_owned()),
        _ => None,
    }
}

/// Attaches a closed element to its parent, or makes it the document root.
fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => {
            parent.text_closed = true;
            parent.children.push(element);
        }
        None if root.is_none() => *root = Some(element),
        None => trace!("Ignoring extra top-level element <{}>", element.local),
    }
}

fn parse_document(xml: &str) -> Result<Option<Element>, FeedError> {
    let mut reader = NsReader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let position = reader.buffer_position();
        let (namespace, event) = match reader.read_resolved_event() {
            Ok((resolved, event)) => (namespace_of(resolved), event),
            Err(e) => return Err(FeedError::Xml { position, message: e.to_string() }),
        };

        match event {
            Event::Start(start) => {
                stack.push(Element::new(namespace, start.local_name().as_ref()));
            }
            Event::Empty(start) => {
                let element = Element::new(namespace, start.local_name().as_ref());
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    // Unknown entities (e.g. HTML `&nbsp;`) keep their raw form
                    match text.unescape() {
                        Ok(unescaped) => current.push_text(&unescaped),
                        Err(_) => current.push_text(&String::from_utf8_lossy(&text)),
                    }
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current.push_text(&String::from_utf8_lossy(&data));
                }
            }
            Event::Comment(_) => {
                if let Some(current) = stack.last_mut() {
                    current.text_closed = true;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(FeedError::Xml {
            position: reader.buffer_position(),
            message: format!("unexpected end of document inside <{}>", open.local),
        });
    }

    Ok(root)
}

fn parse_item(element: &Element) -> SourceItem {
    SourceItem {
        id: element.child_text_owned(product::ID),
        title: element.child_text_owned(product::TITLE),
        description: element.child_text_owned(product::DESCRIPTION),
        link: element.child_text_owned(product::LINK),
        image_link: element.child_text_owned(product::IMAGE_LINK),
        availability: element.child_text_owned(product::AVAILABILITY),
        product_type: element.child_text_owned(product::PRODUCT_TYPE),
        google_product_category: element.child_text_owned(product::GOOGLE_PRODUCT_CATEGORY),
        price: element.child_text_owned(product::PRICE),
    }
}

/// Parses an RSS product feed.
///
/// The root's `<channel>` child is required; its `<item>` children become
/// [`SourceItem`]s in document order.
pub fn parse_feed(xml: &str) -> Result<SourceFeed, FeedError> {
    let root = parse_document(xml)?.ok_or(FeedError::MissingRoot)?;

    let channel = root
        .children
        .iter()
        .find(|c| c.is_bare(rss::CHANNEL))
        .ok_or(FeedError::MissingChannel)?;

    let meta_text = |name: &str| {
        channel
            .children
            .iter()
            .find(|c| c.is_bare(name))
            .filter(|c| !c.text.is_empty())
            .map(|c| c.text.clone())
    };

    let meta = ChannelMeta {
        title: meta_text("title"),
        link: meta_text("link"),
        description: meta_text("description"),
    };

    let items: Vec<SourceItem> =
        channel.children.iter().filter(|c| c.is_bare(rss::ITEM)).map(parse_item).collect();

    debug!("Parsed {} items from <{}>", items.len(), root.local);

    Ok(SourceFeed { channel: meta, items })
}
