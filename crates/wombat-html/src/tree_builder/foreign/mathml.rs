//! MathML attribute adjustment.

use wombat_dom::Attribute;

/// [§ 13.2.6.1 Adjust MathML attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-mathml-attributes)
///
/// "if the token has an attribute named definitionurl, change its name to
/// definitionURL (note the case difference)."
pub(crate) fn adjust_mathml_attributes(attributes: &mut [Attribute]) {
    for attr in attributes.iter_mut() {
        if attr.namespace.is_none() && attr.name == "definitionurl" {
            attr.name = "definitionURL".to_string();
        }
    }
}
