use std::str::FromStr;

use crate::error::CheckError;
use crate::xml::tree::Element;

/// Namespace of Jakarta EE deployment descriptors.
pub const JAKARTAEE_NS: &str = "https://jakarta.ee/xml/ns/jakartaee";

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Construction and child element helpers
///////////////////////////////////////////////////////////////////////////////////////////////////

// Deployment descriptors are namespace-qualified by specification, so views
// in this family require both the namespace URI and the local name.
fn expect_jakarta(element: &Element, local_name: &str) -> Result<(), CheckError> {
    if element.name().namespace_uri() == Some(JAKARTAEE_NS)
        && element.name().local_name() == local_name
    {
        Ok(())
    } else {
        Err(CheckError::SchemaMismatch {
            expected: format!("{{{}}}{}", JAKARTAEE_NS, local_name),
            found: element.name().to_string(),
        })
    }
}

fn child_text_option(element: &Element, local_name: &str) -> Option<String> {
    element
        .first_child_named_ns(JAKARTAEE_NS, local_name)
        .map(|e| e.text().trim().to_string())
}

fn child_text(element: &Element, local_name: &str) -> Result<String, CheckError> {
    child_text_option(element, local_name).ok_or_else(|| CheckError::MissingElement {
        element: element.name().to_string(),
        child: local_name.to_string(),
    })
}

fn parse_child_text<T: FromStr>(
    element: &Element,
    local_name: &str,
) -> Result<Option<T>, CheckError> {
    match child_text_option(element, local_name) {
        None => Ok(None),
        Some(text) => T::from_str(&text).map(Some).map_err(|_| CheckError::MalformedText {
            element: local_name.to_string(),
            value: text,
        }),
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Enumerated element values
///////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionType {
    Singleton,
    Stateful,
    Stateless,
}

impl FromStr for SessionType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Singleton" => Ok(SessionType::Singleton),
            "Stateful" => Ok(SessionType::Stateful),
            "Stateless" => Ok(SessionType::Stateless),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceType {
    Bean,
    Container,
}

impl FromStr for PersistenceType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Bean" => Ok(PersistenceType::Bean),
            "Container" => Ok(PersistenceType::Container),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodIntfType {
    Home,
    Remote,
    LocalHome,
    Local,
    ServiceEndpoint,
    Timer,
    MessageEndpoint,
}

impl FromStr for MethodIntfType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Home" => Ok(MethodIntfType::Home),
            "Remote" => Ok(MethodIntfType::Remote),
            "LocalHome" => Ok(MethodIntfType::LocalHome),
            "Local" => Ok(MethodIntfType::Local),
            "ServiceEndpoint" => Ok(MethodIntfType::ServiceEndpoint),
            "Timer" => Ok(MethodIntfType::Timer),
            "MessageEndpoint" => Ok(MethodIntfType::MessageEndpoint),
            _ => Err(()),
        }
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////
///////////////////////////////////////////////////////////////////////////////////////////////////
// Views
///////////////////////////////////////////////////////////////////////////////////////////////////

/// The `enterprise-beans` element of an EJB deployment descriptor.
#[derive(Debug, Clone, Copy)]
pub struct EnterpriseBeans<'a> {
    element: &'a Element,
}

impl<'a> EnterpriseBeans<'a> {
    pub fn new(element: &'a Element) -> Result<Self, CheckError> {
        expect_jakarta(element, "enterprise-beans")?;
        Ok(Self { element })
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }

    pub fn id_option(&self) -> Option<&'a str> {
        self.element.attribute("id")
    }

    pub fn session_beans(&self) -> Result<Vec<SessionBean<'a>>, CheckError> {
        self.element
            .children_named_ns(JAKARTAEE_NS, "session")
            .map(SessionBean::new)
            .collect()
    }

    pub fn entity_beans(&self) -> Result<Vec<EntityBean<'a>>, CheckError> {
        self.element
            .children_named_ns(JAKARTAEE_NS, "entity")
            .map(EntityBean::new)
            .collect()
    }

    pub fn message_driven_beans(&self) -> Result<Vec<MessageDrivenBean<'a>>, CheckError> {
        self.element
            .children_named_ns(JAKARTAEE_NS, "message-driven")
            .map(MessageDrivenBean::new)
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SessionBean<'a> {
    element: &'a Element,
}

impl<'a> SessionBean<'a> {
    pub fn new(element: &'a Element) -> Result<Self, CheckError> {
        expect_jakarta(element, "session")?;
        Ok(Self { element })
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }

    pub fn id_option(&self) -> Option<&'a str> {
        self.element.attribute("id")
    }

    pub fn ejb_name(&self) -> Result<String, CheckError> {
        child_text(self.element, "ejb-name")
    }

    pub fn ejb_class_option(&self) -> Option<String> {
        child_text_option(self.element, "ejb-class")
    }

    pub fn mapped_name_option(&self) -> Option<String> {
        child_text_option(self.element, "mapped-name")
    }

    pub fn session_type_option(&self) -> Result<Option<SessionType>, CheckError> {
        parse_child_text(self.element, "session-type")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EntityBean<'a> {
    element: &'a Element,
}

impl<'a> EntityBean<'a> {
    pub fn new(element: &'a Element) -> Result<Self, CheckError> {
        expect_jakarta(element, "entity")?;
        Ok(Self { element })
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }

    pub fn id_option(&self) -> Option<&'a str> {
        self.element.attribute("id")
    }

    pub fn ejb_name(&self) -> Result<String, CheckError> {
        child_text(self.element, "ejb-name")
    }

    pub fn ejb_class_option(&self) -> Option<String> {
        child_text_option(self.element, "ejb-class")
    }

    pub fn persistence_type_option(&self) -> Result<Option<PersistenceType>, CheckError> {
        parse_child_text(self.element, "persistence-type")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MessageDrivenBean<'a> {
    element: &'a Element,
}

impl<'a> MessageDrivenBean<'a> {
    pub fn new(element: &'a Element) -> Result<Self, CheckError> {
        expect_jakarta(element, "message-driven")?;
        Ok(Self { element })
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }

    pub fn id_option(&self) -> Option<&'a str> {
        self.element.attribute("id")
    }

    pub fn ejb_name(&self) -> Result<String, CheckError> {
        child_text(self.element, "ejb-name")
    }

    pub fn ejb_class_option(&self) -> Option<String> {
        child_text_option(self.element, "ejb-class")
    }

    pub fn messaging_type_option(&self) -> Option<String> {
        child_text_option(self.element, "messaging-type")
    }

    pub fn mapped_name_option(&self) -> Option<String> {
        child_text_option(self.element, "mapped-name")
    }
}

/// The `method` element used in container-transaction and permission lists.
#[derive(Debug, Clone, Copy)]
pub struct Method<'a> {
    element: &'a Element,
}

impl<'a> Method<'a> {
    pub fn new(element: &'a Element) -> Result<Self, CheckError> {
        expect_jakarta(element, "method")?;
        Ok(Self { element })
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }

    pub fn id_option(&self) -> Option<&'a str> {
        self.element.attribute("id")
    }

    pub fn ejb_name(&self) -> Result<String, CheckError> {
        child_text(self.element, "ejb-name")
    }

    pub fn method_name(&self) -> Result<String, CheckError> {
        child_text(self.element, "method-name")
    }

    pub fn method_intf_option(&self) -> Result<Option<MethodIntfType>, CheckError> {
        parse_child_text(self.element, "method-intf")
    }

    pub fn method_params_option(&self) -> Result<Option<MethodParams<'a>>, CheckError> {
        self.element
            .first_child_named_ns(JAKARTAEE_NS, "method-params")
            .map(MethodParams::new)
            .transpose()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MethodParams<'a> {
    element: &'a Element,
}

impl<'a> MethodParams<'a> {
    pub fn new(element: &'a Element) -> Result<Self, CheckError> {
        expect_jakarta(element, "method-params")?;
        Ok(Self { element })
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }

    pub fn id_option(&self) -> Option<&'a str> {
        self.element.attribute("id")
    }

    pub fn method_params(&self) -> Vec<String> {
        self.element
            .children_named_ns(JAKARTAEE_NS, "method-param")
            .map(|e| e.text().trim().to_string())
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Relationships<'a> {
    element: &'a Element,
}

impl<'a> Relationships<'a> {
    pub fn new(element: &'a Element) -> Result<Self, CheckError> {
        expect_jakarta(element, "relationships")?;
        Ok(Self { element })
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }

    pub fn id_option(&self) -> Option<&'a str> {
        self.element.attribute("id")
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

    const EJB_JAR_XML: &str = r#"
        <enterprise-beans xmlns="https://jakarta.ee/xml/ns/jakartaee" id="beans1">
            <session>
                <ejb-name>OrderService</ejb-name>
                <ejb-class>com.example.OrderServiceBean</ejb-class>
                <session-type>Stateless</session-type>
            </session>
            <entity>
                <ejb-name>Order</ejb-name>
                <persistence-type>Container</persistence-type>
            </entity>
            <message-driven>
                <ejb-name>OrderListener</ejb-name>
                <messaging-type>jakarta.jms.MessageListener</messaging-type>
            </message-driven>
        </enterprise-beans>"#;

    #[test]
    fn namespace_is_required_for_this_family() {
        let unqualified = Element::new(QName::local("enterprise-beans"));
        assert!(matches!(
            EnterpriseBeans::new(&unqualified),
            Err(CheckError::SchemaMismatch { .. })
        ));

        let wrong_ns = Element::new(QName::namespaced("urn:other", "enterprise-beans"));
        assert!(matches!(
            EnterpriseBeans::new(&wrong_ns),
            Err(CheckError::SchemaMismatch { .. })
        ));

        let right = Element::new(QName::namespaced(JAKARTAEE_NS, "enterprise-beans"));
        assert!(EnterpriseBeans::new(&right).is_ok());

        let relationships = Element::new(QName::namespaced(JAKARTAEE_NS, "relationships"))
            .with_attribute("id", "rel1");
        let view = Relationships::new(&relationships).unwrap();
        assert_eq!(view.id_option(), Some("rel1"));
        assert!(matches!(
            Relationships::new(&right),
            Err(CheckError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn bean_collections_and_child_text() {
        let doc = Document::parse(EJB_JAR_XML).unwrap();
        let beans = EnterpriseBeans::new(doc.root()).unwrap();
        assert_eq!(beans.id_option(), Some("beans1"));

        let sessions = beans.session_beans().unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].ejb_name().unwrap(), "OrderService");
        assert_eq!(
            sessions[0].ejb_class_option().as_deref(),
            Some("com.example.OrderServiceBean")
        );
        assert_eq!(
            sessions[0].session_type_option().unwrap(),
            Some(SessionType::Stateless)
        );
        assert_eq!(sessions[0].mapped_name_option(), None);

        let entities = beans.entity_beans().unwrap();
        assert_eq!(
            entities[0].persistence_type_option().unwrap(),
            Some(PersistenceType::Container)
        );

        let mdbs = beans.message_driven_beans().unwrap();
        assert_eq!(mdbs[0].ejb_name().unwrap(), "OrderListener");
    }

    #[test]
    fn missing_required_child_is_an_error() {
        let element = Element::new(QName::namespaced(JAKARTAEE_NS, "session"));
        let bean = SessionBean::new(&element).unwrap();
        assert!(matches!(
            bean.ejb_name(),
            Err(CheckError::MissingElement { .. })
        ));
    }

    #[test]
    fn malformed_enumerated_text_is_an_error() {
        let xml = r#"<session xmlns="https://jakarta.ee/xml/ns/jakartaee">
            <ejb-name>X</ejb-name>
            <session-type>stateless</session-type>
        </session>"#;
        let doc = Document::parse(xml).unwrap();
        let bean = SessionBean::new(doc.root()).unwrap();
        assert!(matches!(
            bean.session_type_option(),
            Err(CheckError::MalformedText { .. })
        ));
    }

    #[test]
    fn method_views_expose_method_level_metadata() {
        let xml = r#"<method xmlns="https://jakarta.ee/xml/ns/jakartaee">
            <ejb-name>OrderService</ejb-name>
            <method-intf>Local</method-intf>
            <method-name>placeOrder</method-name>
            <method-params>
                <method-param>java.lang.String</method-param>
                <method-param>int</method-param>
            </method-params>
        </method>"#;
        let doc = Document::parse(xml).unwrap();
        let method = Method::new(doc.root()).unwrap();
        assert_eq!(method.ejb_name().unwrap(), "OrderService");
        assert_eq!(method.method_name().unwrap(), "placeOrder");
        assert_eq!(
            method.method_intf_option().unwrap(),
            Some(MethodIntfType::Local)
        );
        let params = method.method_params_option().unwrap().unwrap();
        assert_eq!(params.method_params(), vec!["java.lang.String", "int"]);
    }
}
