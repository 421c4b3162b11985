//! Attribute schemas exposed to the declarative consumer.

/// Whether the consumer supplies an attribute or the provider fills it in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeMode {
    Required,
    Optional,
    Computed,
}

/// The value type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    String,
    Int64,
    /// A list of objects, each with the given attributes.
    ListNested(&'static [Attribute]),
}

/// A named attribute with its type, mode and documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    pub kind: AttributeKind,
    pub mode: AttributeMode,
    pub description: &'static str,
}

impl Attribute {
    const fn required(name: &'static str, kind: AttributeKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            mode: AttributeMode::Required,
            description,
        }
    }

    const fn optional(name: &'static str, kind: AttributeKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            mode: AttributeMode::Optional,
            description,
        }
    }

    const fn computed(name: &'static str, kind: AttributeKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            mode: AttributeMode::Computed,
            description,
        }
    }

    /// Nested attributes of a list attribute.
    pub fn nested(&self) -> &'static [Attribute] {
        match self.kind {
            AttributeKind::ListNested(attributes) => attributes,
            AttributeKind::String | AttributeKind::Int64 => &[],
        }
    }
}

/// The top-level schema of the provider or of a data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub description: &'static str,
    pub attributes: &'static [Attribute],
}

impl Schema {
    /// Looks up a top-level attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&'static Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

const ID_ATTRIBUTE: Attribute = Attribute::computed(
    "id",
    AttributeKind::String,
    "Placeholder identifier attribute.",
);

pub static PROVIDER_SCHEMA: Schema = Schema {
    description: "Interact with theOffice API",
    attributes: &[Attribute::optional(
        "endpoint",
        AttributeKind::String,
        "The REST API endpoint to use for reading data (default: http://theofficeapi-angelinepinilla.b4a.run)",
    )],
};

const LINK_ATTRIBUTES: &[Attribute] = &[
    Attribute::computed(
        "source",
        AttributeKind::String,
        "The name of the source character.",
    ),
    Attribute::computed(
        "target",
        AttributeKind::String,
        "The name of the target character.",
    ),
    Attribute::computed("value", AttributeKind::Int64, "The value of the link."),
];

const NODE_ATTRIBUTES: &[Attribute] = &[Attribute::computed(
    "id",
    AttributeKind::String,
    "The name of the character.",
)];

const CONNECTION_ATTRIBUTES: &[Attribute] = &[
    Attribute::computed(
        "episode",
        AttributeKind::Int64,
        "The episode the connection, i.e. dialogue between characters, occurred in.",
    ),
    Attribute::computed(
        "episode_name",
        AttributeKind::String,
        "The name of the episode the connection, i.e. dialogue between characters, occurred in.",
    ),
    Attribute::computed(
        "links",
        AttributeKind::ListNested(LINK_ATTRIBUTES),
        "The list of links between characters",
    ),
    Attribute::computed(
        "nodes",
        AttributeKind::ListNested(NODE_ATTRIBUTES),
        "The list of nodes i.e. characters in the episode",
    ),
];

pub static CONNECTIONS_SCHEMA: Schema = Schema {
    description: "Fetches a list of character connections",
    attributes: &[
        ID_ATTRIBUTE,
        Attribute::required(
            "season",
            AttributeKind::Int64,
            "Season number to filter results by",
        ),
        Attribute::computed(
            "connections",
            AttributeKind::ListNested(CONNECTION_ATTRIBUTES),
            "List of character connections",
        ),
    ],
};

const QUOTE_ATTRIBUTES: &[Attribute] = &[
    Attribute::computed(
        "season",
        AttributeKind::Int64,
        "The season the quote occurred in.",
    ),
    Attribute::computed(
        "episode",
        AttributeKind::Int64,
        "The episode the quote occurred in.",
    ),
    Attribute::computed(
        "scene",
        AttributeKind::Int64,
        "The scene the quote occurred in.",
    ),
    Attribute::computed(
        "episode_name",
        AttributeKind::String,
        "The name of the episode the quote occurred in.",
    ),
    Attribute::computed(
        "character",
        AttributeKind::String,
        "The character who said the quote.",
    ),
    Attribute::computed("quote", AttributeKind::String, "The quote itself."),
];

pub static QUOTES_SCHEMA: Schema = Schema {
    description: "Fetches a list of quotes",
    attributes: &[
        ID_ATTRIBUTE,
        Attribute::optional(
            "episode",
            AttributeKind::Int64,
            "Episode number to filter results by",
        ),
        Attribute::required(
            "season",
            AttributeKind::Int64,
            "Season number to filter results by",
        ),
        Attribute::computed(
            "quotes",
            AttributeKind::ListNested(QUOTE_ATTRIBUTES),
            "List of quotes",
        ),
    ],
};
