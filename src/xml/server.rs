use crate::error::CheckError;
use crate::xml::tree::Element;

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Construction and attribute helpers
///////////////////////////////////////////////////////////////////////////////////////////////////

// Server configuration elements predate strict namespacing, so views in this
// family match on local name only.
fn expect_local(element: &Element, local_name: &str) -> Result<(), CheckError> {
    if element.name().local_name() == local_name {
        Ok(())
    } else {
        Err(CheckError::SchemaMismatch {
            expected: local_name.to_string(),
            found: element.name().to_string(),
        })
    }
}

fn require_attribute<'a>(element: &'a Element, attribute: &str) -> Result<&'a str, CheckError> {
    element
        .attribute(attribute)
        .ok_or_else(|| CheckError::MissingAttribute {
            element: element.name().to_string(),
            attribute: attribute.to_string(),
        })
}

// Absence yields the product default; a present but unparsable value is an
// error, never the default.
fn port_attribute(element: &Element, attribute: &str, default: u16) -> Result<u16, CheckError> {
    match element.attribute(attribute) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| malformed(element, attribute, raw, "port number")),
    }
}

fn count_attribute(element: &Element, attribute: &str, default: u32) -> Result<u32, CheckError> {
    match element.attribute(attribute) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| malformed(element, attribute, raw, "count")),
    }
}

fn count_attribute_option(element: &Element, attribute: &str) -> Result<Option<u32>, CheckError> {
    match element.attribute(attribute) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| malformed(element, attribute, raw, "count")),
    }
}

fn bool_attribute_option(element: &Element, attribute: &str) -> Result<Option<bool>, CheckError> {
    match element.attribute(attribute) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| malformed(element, attribute, raw, "boolean")),
    }
}

fn malformed(element: &Element, attribute: &str, value: &str, target: &'static str) -> CheckError {
    CheckError::MalformedAttribute {
        element: element.name().to_string(),
        attribute: attribute.to_string(),
        value: value.to_string(),
        target,
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Root element
///////////////////////////////////////////////////////////////////////////////////////////////////

/// Root element of a server configuration file.
///
/// A server configuration file may still contain unresolved configuration
/// variables, so string accessors return the raw attribute text.
#[derive(Debug, Clone, Copy)]
pub struct Server<'a> {
    element: &'a Element,
}

impl<'a> Server<'a> {
    pub fn new(element: &'a Element) -> Result<Self, CheckError> {
        expect_local(element, "server")?;
        Ok(Self { element })
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }

    pub fn description_option(&self) -> Option<&'a str> {
        self.element.attribute("description")
    }

    pub fn features(&self) -> Vec<String> {
        self.element
            .children_named("featureManager")
            .flat_map(|e| e.children_named("feature"))
            .map(|e| e.text().trim().to_string())
            .collect()
    }

    pub fn http_endpoints(&self) -> Result<Vec<HttpEndpoint<'a>>, CheckError> {
        self.element
            .children_named("httpEndpoint")
            .map(HttpEndpoint::new)
            .collect()
    }

    pub fn application_manager_option(&self) -> Result<Option<ApplicationManager<'a>>, CheckError> {
        self.element
            .first_child_named("applicationManager")
            .map(ApplicationManager::new)
            .transpose()
    }

    pub fn jndi_entries(&self) -> Result<Vec<JndiEntry<'a>>, CheckError> {
        self.element.children_named("jndiEntry").map(JndiEntry::new).collect()
    }

    pub fn connection_managers(&self) -> Result<Vec<ConnectionManager<'a>>, CheckError> {
        self.element
            .children_named("connectionManager")
            .map(ConnectionManager::new)
            .collect()
    }

    pub fn jms_activation_specs(&self) -> Result<Vec<JmsActivationSpec<'a>>, CheckError> {
        self.element
            .children_named("jmsActivationSpec")
            .map(JmsActivationSpec::new)
            .collect()
    }

    pub fn jms_queues(&self) -> Result<Vec<JmsQueue<'a>>, CheckError> {
        self.element.children_named("jmsQueue").map(JmsQueue::new).collect()
    }

    pub fn jms_topics(&self) -> Result<Vec<JmsTopic<'a>>, CheckError> {
        self.element.children_named("jmsTopic").map(JmsTopic::new).collect()
    }

    pub fn key_stores(&self) -> Result<Vec<KeyStore<'a>>, CheckError> {
        self.element.children_named("keyStore").map(KeyStore::new).collect()
    }

    pub fn messaging_engines(&self) -> Result<Vec<MessagingEngine<'a>>, CheckError> {
        self.element
            .children_named("messagingEngine")
            .map(MessagingEngine::new)
            .collect()
    }

    pub fn resource_adapters(&self) -> Result<Vec<ResourceAdapter<'a>>, CheckError> {
        self.element
            .children_named("resourceAdapter")
            .map(ResourceAdapter::new)
            .collect()
    }

    pub fn ssls(&self) -> Result<Vec<Ssl<'a>>, CheckError> {
        self.element.children_named("ssl").map(Ssl::new).collect()
    }

    pub fn ssl_defaults(&self) -> Result<Vec<SslDefault<'a>>, CheckError> {
        self.element.children_named("sslDefault").map(SslDefault::new).collect()
    }

    pub fn was_jms_endpoints(&self) -> Result<Vec<WasJmsEndpoint<'a>>, CheckError> {
        self.element
            .children_named("wasJmsEndpoint")
            .map(WasJmsEndpoint::new)
            .collect()
    }

    pub fn web_applications(&self) -> Result<Vec<WebApplication<'a>>, CheckError> {
        self.element
            .children_named("webApplication")
            .map(WebApplication::new)
            .collect()
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Child elements
///////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy)]
pub struct HttpEndpoint<'a> {
    element: &'a Element,
}

impl<'a> HttpEndpoint<'a> {
    pub fn new(element: &'a Element) -> Result<Self, CheckError> {
        expect_local(element, "httpEndpoint")?;
        Ok(Self { element })
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }

    pub fn id_option(&self) -> Option<&'a str> {
        self.element.attribute("id")
    }

    pub fn host_option(&self) -> Option<&'a str> {
        self.element.attribute("host")
    }

    pub fn host(&self) -> &'a str {
        self.host_option().unwrap_or("localhost")
    }

    // In case configuration variables have not yet been resolved

    pub fn http_port_as_string_option(&self) -> Option<&'a str> {
        self.element.attribute("httpPort")
    }

    pub fn https_port_as_string_option(&self) -> Option<&'a str> {
        self.element.attribute("httpsPort")
    }

    pub fn http_port(&self) -> Result<u16, CheckError> {
        port_attribute(self.element, "httpPort", 9080)
    }

    pub fn https_port(&self) -> Result<u16, CheckError> {
        port_attribute(self.element, "httpsPort", 9443)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ApplicationManager<'a> {
    element: &'a Element,
}

impl<'a> ApplicationManager<'a> {
    pub fn new(element: &'a Element) -> Result<Self, CheckError> {
        expect_local(element, "applicationManager")?;
        Ok(Self { element })
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }

    pub fn auto_expand_as_string_option(&self) -> Option<&'a str> {
        self.element.attribute("autoExpand")
    }

    pub fn auto_expand_option(&self) -> Result<Option<bool>, CheckError> {
        bool_attribute_option(self.element, "autoExpand")
    }
}

/// JNDI entry binding a literal value under a JNDI name.
#[derive(Debug, Clone, Copy)]
pub struct JndiEntry<'a> {
    element: &'a Element,
}

impl<'a> JndiEntry<'a> {
    pub fn new(element: &'a Element) -> Result<Self, CheckError> {
        expect_local(element, "jndiEntry")?;
        Ok(Self { element })
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }

    pub fn id_option(&self) -> Option<&'a str> {
        self.element.attribute("id")
    }

    pub fn jndi_name_option(&self) -> Option<&'a str> {
        self.element.attribute("jndiName")
    }

    pub fn jndi_name(&self) -> Result<&'a str, CheckError> {
        require_attribute(self.element, "jndiName")
    }

    pub fn value_option(&self) -> Option<&'a str> {
        self.element.attribute("value")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ConnectionManager<'a> {
    element: &'a Element,
}

impl<'a> ConnectionManager<'a> {
    pub fn new(element: &'a Element) -> Result<Self, CheckError> {
        expect_local(element, "connectionManager")?;
        Ok(Self { element })
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }

    pub fn id_option(&self) -> Option<&'a str> {
        self.element.attribute("id")
    }

    pub fn max_pool_size_as_string_option(&self) -> Option<&'a str> {
        self.element.attribute("maxPoolSize")
    }

    pub fn max_pool_size(&self) -> Result<u32, CheckError> {
        count_attribute(self.element, "maxPoolSize", 50)
    }

    pub fn min_pool_size_as_string_option(&self) -> Option<&'a str> {
        self.element.attribute("minPoolSize")
    }

    pub fn min_pool_size_option(&self) -> Result<Option<u32>, CheckError> {
        count_attribute_option(self.element, "minPoolSize")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct JmsActivationSpec<'a> {
    element: &'a Element,
}

impl<'a> JmsActivationSpec<'a> {
    pub fn new(element: &'a Element) -> Result<Self, CheckError> {
        expect_local(element, "jmsActivationSpec")?;
        Ok(Self { element })
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }

    pub fn id_option(&self) -> Option<&'a str> {
        self.element.attribute("id")
    }

    pub fn auth_data_ref_option(&self) -> Option<&'a str> {
        self.element.attribute("authDataRef")
    }

    pub fn max_endpoints_as_string_option(&self) -> Option<&'a str> {
        self.element.attribute("maxEndpoints")
    }

    pub fn max_endpoints(&self) -> Result<u32, CheckError> {
        count_attribute(self.element, "maxEndpoints", 500)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct JmsQueue<'a> {
    element: &'a Element,
}

impl<'a> JmsQueue<'a> {
    pub fn new(element: &'a Element) -> Result<Self, CheckError> {
        expect_local(element, "jmsQueue")?;
        Ok(Self { element })
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }

    pub fn id_option(&self) -> Option<&'a str> {
        self.element.attribute("id")
    }

    pub fn jndi_name_option(&self) -> Option<&'a str> {
        self.element.attribute("jndiName")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct JmsTopic<'a> {
    element: &'a Element,
}

impl<'a> JmsTopic<'a> {
    pub fn new(element: &'a Element) -> Result<Self, CheckError> {
        expect_local(element, "jmsTopic")?;
        Ok(Self { element })
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }

    pub fn id_option(&self) -> Option<&'a str> {
        self.element.attribute("id")
    }

    pub fn jndi_name_option(&self) -> Option<&'a str> {
        self.element.attribute("jndiName")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct KeyStore<'a> {
    element: &'a Element,
}

impl<'a> KeyStore<'a> {
    pub fn new(element: &'a Element) -> Result<Self, CheckError> {
        expect_local(element, "keyStore")?;
        Ok(Self { element })
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }

    pub fn id_option(&self) -> Option<&'a str> {
        self.element.attribute("id")
    }

    pub fn location_option(&self) -> Option<&'a str> {
        self.element.attribute("location")
    }

    pub fn password_option(&self) -> Option<&'a str> {
        self.element.attribute("password")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MessagingEngine<'a> {
    element: &'a Element,
}

impl<'a> MessagingEngine<'a> {
    pub fn new(element: &'a Element) -> Result<Self, CheckError> {
        expect_local(element, "messagingEngine")?;
        Ok(Self { element })
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }

    pub fn id_option(&self) -> Option<&'a str> {
        self.element.attribute("id")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ResourceAdapter<'a> {
    element: &'a Element,
}

impl<'a> ResourceAdapter<'a> {
    pub fn new(element: &'a Element) -> Result<Self, CheckError> {
        expect_local(element, "resourceAdapter")?;
        Ok(Self { element })
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }

    pub fn id_option(&self) -> Option<&'a str> {
        self.element.attribute("id")
    }

    pub fn location(&self) -> Result<&'a str, CheckError> {
        require_attribute(self.element, "location")
    }

    // In case configuration variables have not yet been resolved

    pub fn auto_start_as_string_option(&self) -> Option<&'a str> {
        self.element.attribute("autoStart")
    }

    pub fn auto_start_option(&self) -> Result<Option<bool>, CheckError> {
        bool_attribute_option(self.element, "autoStart")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Ssl<'a> {
    element: &'a Element,
}

impl<'a> Ssl<'a> {
    pub fn new(element: &'a Element) -> Result<Self, CheckError> {
        expect_local(element, "ssl")?;
        Ok(Self { element })
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }

    pub fn id_option(&self) -> Option<&'a str> {
        self.element.attribute("id")
    }

    pub fn key_store_ref_option(&self) -> Option<&'a str> {
        self.element.attribute("keyStoreRef")
    }

    pub fn trust_store_ref_option(&self) -> Option<&'a str> {
        self.element.attribute("trustStoreRef")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SslDefault<'a> {
    element: &'a Element,
}

impl<'a> SslDefault<'a> {
    pub fn new(element: &'a Element) -> Result<Self, CheckError> {
        expect_local(element, "sslDefault")?;
        Ok(Self { element })
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }

    pub fn ssl_ref_option(&self) -> Option<&'a str> {
        self.element.attribute("sslRef")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WasJmsEndpoint<'a> {
    element: &'a Element,
}

impl<'a> WasJmsEndpoint<'a> {
    pub fn new(element: &'a Element) -> Result<Self, CheckError> {
        expect_local(element, "wasJmsEndpoint")?;
        Ok(Self { element })
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }

    pub fn id_option(&self) -> Option<&'a str> {
        self.element.attribute("id")
    }

    pub fn host_option(&self) -> Option<&'a str> {
        self.element.attribute("host")
    }

    pub fn host(&self) -> &'a str {
        self.host_option().unwrap_or("localhost")
    }

    // In case configuration variables have not yet been resolved

    pub fn was_jms_port_as_string_option(&self) -> Option<&'a str> {
        self.element.attribute("wasJmsPort")
    }

    pub fn was_jms_ssl_port_as_string_option(&self) -> Option<&'a str> {
        self.element.attribute("wasJmsSSLPort")
    }

    pub fn was_jms_port(&self) -> Result<u16, CheckError> {
        port_attribute(self.element, "wasJmsPort", 7276)
    }

    pub fn was_jms_ssl_port(&self) -> Result<u16, CheckError> {
        port_attribute(self.element, "wasJmsSSLPort", 7286)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WebApplication<'a> {
    element: &'a Element,
}

impl<'a> WebApplication<'a> {
    pub fn new(element: &'a Element) -> Result<Self, CheckError> {
        expect_local(element, "webApplication")?;
        Ok(Self { element })
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }

    pub fn id_option(&self) -> Option<&'a str> {
        self.element.attribute("id")
    }

    pub fn context_root_option(&self) -> Option<&'a str> {
        self.element.attribute("contextRoot")
    }

    pub fn location_option(&self) -> Option<&'a str> {
        self.element.attribute("location")
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Element kind dispatch
///////////////////////////////////////////////////////////////////////////////////////////////////

/// A recognized server configuration child element, as a typed view.
#[derive(Debug, Clone, Copy)]
pub enum ServerContent<'a> {
    HttpEndpoint(HttpEndpoint<'a>),
    ApplicationManager(ApplicationManager<'a>),
    JndiEntry(JndiEntry<'a>),
    ConnectionManager(ConnectionManager<'a>),
    JmsActivationSpec(JmsActivationSpec<'a>),
    JmsQueue(JmsQueue<'a>),
    JmsTopic(JmsTopic<'a>),
    KeyStore(KeyStore<'a>),
    MessagingEngine(MessagingEngine<'a>),
    ResourceAdapter(ResourceAdapter<'a>),
    Ssl(Ssl<'a>),
    SslDefault(SslDefault<'a>),
    WasJmsEndpoint(WasJmsEndpoint<'a>),
    WebApplication(WebApplication<'a>),
}

pub type ViewConstructor = for<'a> fn(&'a Element) -> Result<ServerContent<'a>, CheckError>;

/// Dispatch table from local element name to view constructor. Adding a new
/// recognized element kind is a table entry, not a new branch at call sites.
pub const CONTENT_KINDS: &[(&str, ViewConstructor)] = &[
    ("httpEndpoint", |e| Ok(ServerContent::HttpEndpoint(HttpEndpoint::new(e)?))),
    ("applicationManager", |e| {
        Ok(ServerContent::ApplicationManager(ApplicationManager::new(e)?))
    }),
    ("jndiEntry", |e| Ok(ServerContent::JndiEntry(JndiEntry::new(e)?))),
    ("connectionManager", |e| {
        Ok(ServerContent::ConnectionManager(ConnectionManager::new(e)?))
    }),
    ("jmsActivationSpec", |e| {
        Ok(ServerContent::JmsActivationSpec(JmsActivationSpec::new(e)?))
    }),
    ("jmsQueue", |e| Ok(ServerContent::JmsQueue(JmsQueue::new(e)?))),
    ("jmsTopic", |e| Ok(ServerContent::JmsTopic(JmsTopic::new(e)?))),
    ("keyStore", |e| Ok(ServerContent::KeyStore(KeyStore::new(e)?))),
    ("messagingEngine", |e| {
        Ok(ServerContent::MessagingEngine(MessagingEngine::new(e)?))
    }),
    ("resourceAdapter", |e| {
        Ok(ServerContent::ResourceAdapter(ResourceAdapter::new(e)?))
    }),
    ("ssl", |e| Ok(ServerContent::Ssl(Ssl::new(e)?))),
    ("sslDefault", |e| Ok(ServerContent::SslDefault(SslDefault::new(e)?))),
    ("wasJmsEndpoint", |e| {
        Ok(ServerContent::WasJmsEndpoint(WasJmsEndpoint::new(e)?))
    }),
    ("webApplication", |e| {
        Ok(ServerContent::WebApplication(WebApplication::new(e)?))
    }),
];

/// Wraps a child element of `server` in its typed view, if its local name is
/// a recognized element kind.
pub fn recognize(element: &Element) -> Option<Result<ServerContent<'_>, CheckError>> {
    CONTENT_KINDS
        .iter()
        .find(|(local_name, _)| *local_name == element.name().local_name())
        .map(|(_, constructor)| constructor(element))
}

impl<'a> ServerContent<'a> {
    pub fn local_name(&self) -> &'static str {
        match self {
            ServerContent::HttpEndpoint(_) => "httpEndpoint",
            ServerContent::ApplicationManager(_) => "applicationManager",
            ServerContent::JndiEntry(_) => "jndiEntry",
            ServerContent::ConnectionManager(_) => "connectionManager",
            ServerContent::JmsActivationSpec(_) => "jmsActivationSpec",
            ServerContent::JmsQueue(_) => "jmsQueue",
            ServerContent::JmsTopic(_) => "jmsTopic",
            ServerContent::KeyStore(_) => "keyStore",
            ServerContent::MessagingEngine(_) => "messagingEngine",
            ServerContent::ResourceAdapter(_) => "resourceAdapter",
            ServerContent::Ssl(_) => "ssl",
            ServerContent::SslDefault(_) => "sslDefault",
            ServerContent::WasJmsEndpoint(_) => "wasJmsEndpoint",
            ServerContent::WebApplication(_) => "webApplication",
        }
    }

    /// The identifying name under which this entry can satisfy a resource
    /// reference, if this element kind has one.
    pub fn identifying_name(&self) -> Option<&'a str> {
        match self {
            ServerContent::JndiEntry(e) => e.jndi_name_option(),
            ServerContent::JmsQueue(e) => e.jndi_name_option(),
            ServerContent::JmsTopic(e) => e.jndi_name_option(),
            ServerContent::JmsActivationSpec(e) => e.id_option(),
            ServerContent::ConnectionManager(e) => e.id_option(),
            ServerContent::KeyStore(e) => e.id_option(),
            ServerContent::MessagingEngine(e) => e.id_option(),
            ServerContent::ResourceAdapter(e) => e.id_option(),
            ServerContent::HttpEndpoint(e) => e.id_option(),
            ServerContent::WebApplication(e) => e.id_option(),
            ServerContent::Ssl(e) => e.id_option(),
            ServerContent::ApplicationManager(_)
            | ServerContent::SslDefault(_)
            | ServerContent::WasJmsEndpoint(_) => None,
        }
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::tree::{Document, QName};

    const SERVER_XML: &str = r#"
        <server description="msg server">
            <featureManager>
                <feature>jndi-1.0</feature>
                <feature>wasJmsServer-1.0</feature>
            </featureManager>
            <applicationManager autoExpand="true"/>
            <jndiEntry jndiName="jdbc/myDS" value="jdbc:h2:mem:test"/>
            <connectionManager id="cm1" minPoolSize="5"/>
            <jmsQueue id="q1" jndiName="jms/orders"/>
            <wasJmsEndpoint id="wje" wasJmsPort="9999"/>
            <resourceAdapter id="ra1" location="${shared.resource.dir}/ra.rar"/>
        </server>"#;

    fn server_doc() -> Document {
        Document::parse(SERVER_XML).unwrap()
    }

    #[test]
    fn wrap_succeeds_only_on_the_expected_local_name() {
        let element = Element::new(QName::local("jmsQueue"));
        assert!(JmsQueue::new(&element).is_ok());
        assert!(matches!(
            Server::new(&element),
            Err(CheckError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn every_declared_view_kind_enforces_its_name() {
        let wrong = Element::new(QName::local("bogusElement"));
        for (local_name, constructor) in CONTENT_KINDS {
            let right = Element::new(QName::local(*local_name));
            assert!(
                constructor(&right).is_ok(),
                "view for {local_name} rejected its own element"
            );
            assert!(
                matches!(constructor(&wrong), Err(CheckError::SchemaMismatch { .. })),
                "view for {local_name} accepted a wrong-named element"
            );
        }
    }

    #[test]
    fn server_collections_preserve_document_order() {
        let doc = server_doc();
        let server = Server::new(doc.root()).unwrap();
        assert_eq!(server.description_option(), Some("msg server"));
        assert_eq!(server.features(), vec!["jndi-1.0", "wasJmsServer-1.0"]);
        assert_eq!(server.jndi_entries().unwrap().len(), 1);
        assert_eq!(server.jms_queues().unwrap()[0].jndi_name_option(), Some("jms/orders"));
        assert!(server.jms_topics().unwrap().is_empty());
        assert!(server.application_manager_option().unwrap().is_some());
    }

    #[test]
    fn was_jms_endpoint_defaults_and_overrides() {
        let doc = server_doc();
        let server = Server::new(doc.root()).unwrap();
        let endpoint = server.was_jms_endpoints().unwrap()[0];
        assert_eq!(endpoint.host(), "localhost");
        assert_eq!(endpoint.was_jms_port().unwrap(), 9999);
        assert_eq!(endpoint.was_jms_ssl_port().unwrap(), 7286);

        let bare = Element::new(QName::local("wasJmsEndpoint"));
        let endpoint = WasJmsEndpoint::new(&bare).unwrap();
        assert_eq!(endpoint.was_jms_port().unwrap(), 7276);
        assert_eq!(endpoint.was_jms_port_as_string_option(), None);
    }

    #[test]
    fn malformed_attribute_is_an_error_not_the_default() {
        let element = Element::new(QName::local("wasJmsEndpoint"))
            .with_attribute("wasJmsPort", "${jms.port}");
        let endpoint = WasJmsEndpoint::new(&element).unwrap();
        assert_eq!(endpoint.was_jms_port_as_string_option(), Some("${jms.port}"));
        assert!(matches!(
            endpoint.was_jms_port(),
            Err(CheckError::MalformedAttribute { .. })
        ));
    }

    #[test]
    fn http_endpoint_port_defaults() {
        let element = Element::new(QName::local("httpEndpoint"));
        let endpoint = HttpEndpoint::new(&element).unwrap();
        assert_eq!(endpoint.http_port().unwrap(), 9080);
        assert_eq!(endpoint.https_port().unwrap(), 9443);
        assert_eq!(endpoint.host(), "localhost");
    }

    #[test]
    fn connection_manager_pool_sizes() {
        let doc = server_doc();
        let server = Server::new(doc.root()).unwrap();
        let manager = server.connection_managers().unwrap()[0];
        assert_eq!(manager.max_pool_size().unwrap(), 50);
        assert_eq!(manager.min_pool_size_option().unwrap(), Some(5));
    }

    #[test]
    fn required_attributes_are_enforced() {
        let entry = Element::new(QName::local("jndiEntry"));
        let entry = JndiEntry::new(&entry).unwrap();
        assert!(matches!(
            entry.jndi_name(),
            Err(CheckError::MissingAttribute { .. })
        ));

        let element = Element::new(QName::local("resourceAdapter"));
        let adapter = ResourceAdapter::new(&element).unwrap();
        assert!(matches!(
            adapter.location(),
            Err(CheckError::MissingAttribute { .. })
        ));

        let doc = server_doc();
        let server = Server::new(doc.root()).unwrap();
        let adapter = server.resource_adapters().unwrap()[0];
        assert_eq!(adapter.location().unwrap(), "${shared.resource.dir}/ra.rar");
        assert_eq!(adapter.auto_start_option().unwrap(), None);
    }

    #[test]
    fn recognize_dispatches_by_local_name() {
        let doc = server_doc();
        let recognized = doc
            .root()
            .child_elements()
            .filter_map(recognize)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        let names = recognized.iter().map(|c| c.local_name()).collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                "applicationManager",
                "jndiEntry",
                "connectionManager",
                "jmsQueue",
                "wasJmsEndpoint",
                "resourceAdapter"
            ]
        );
        assert!(recognize(&Element::new(QName::local("featureManager"))).is_none());
    }
}
