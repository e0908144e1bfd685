//! Chat window body
//!
//! A message log, a draft input and a send button. Sending goes through an
//! [`AsyncControl`], so a second send while a reply is pending is ignored.

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::async_control::AsyncControl;
use crate::dom::{classes, Document, NodeId};
use crate::error::DomError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

impl ChatRole {
    fn class(self) -> &'static str {
        match self {
            ChatRole::User => "is-user",
            ChatRole::Assistant => "is-assistant",
            ChatRole::System => "is-system",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    #[serde(default)]
    pub meta: Option<String>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            meta: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub placeholder: String,
    pub send_label: String,
    pub empty_text: String,
    pub messages: Vec<ChatMessage>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            placeholder: "Type a message...".to_string(),
            send_label: "Send".to_string(),
            empty_text: "No messages yet".to_string(),
            messages: Vec::new(),
        }
    }
}

/// Mounted chat body
pub struct ChatState {
    root: NodeId,
    log: NodeId,
    input: NodeId,
    send_button: NodeId,
    empty_text: String,
    messages: Rc<RefCell<Vec<ChatMessage>>>,
    /// How many of `messages` already have nodes in the log
    rendered: usize,
    draft: String,
    control: AsyncControl,
}

impl fmt::Debug for ChatState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatState")
            .field("root", &self.root)
            .field("messages", &self.messages.borrow().len())
            .field("rendered", &self.rendered)
            .field("busy", &self.control.is_busy())
            .finish()
    }
}

impl ChatState {
    /// Build the chat body (detached)
    pub fn new(doc: &mut Document, config: ChatConfig) -> Result<Self, DomError> {
        let root = doc.element("div", &["chat"]);
        let log = doc.element("div", &[classes::CHAT_LOG]);
        let composer = doc.element("div", &["chat-composer"]);
        let input = doc.element("textarea", &[classes::CHAT_INPUT]);
        doc.set_attr(input, "placeholder", config.placeholder.as_str());
        let send_button = doc.text_element("button", &[classes::BUTTON], config.send_label.as_str());

        doc.append_child(root, log)?;
        doc.append_child(root, composer)?;
        doc.append_child(composer, input)?;
        doc.append_child(composer, send_button)?;

        let mut chat = Self {
            root,
            log,
            input,
            send_button,
            empty_text: config.empty_text,
            messages: Rc::new(RefCell::new(config.messages)),
            rendered: 0,
            draft: String::new(),
            control: AsyncControl::new(),
        };
        chat.sync(doc);
        Ok(chat)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn send_button(&self) -> NodeId {
        self.send_button
    }

    pub fn control(&self) -> &AsyncControl {
        &self.control
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.borrow().clone()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, doc: &mut Document, text: impl Into<String>) {
        self.draft = text.into();
        doc.set_attr(self.input, "value", self.draft.as_str());
    }

    pub fn append(&mut self, doc: &mut Document, message: ChatMessage) {
        self.messages.borrow_mut().push(message);
        self.sync(doc);
    }

    pub fn clear(&mut self, doc: &mut Document) {
        self.messages.borrow_mut().clear();
        self.sync(doc);
    }

    /// Send the draft through `handler`
    ///
    /// Returns `None` for a blank draft or while a previous send is
    /// outstanding. Otherwise the user message is logged, the draft is
    /// cleared and the returned future appends the reply (if any). A
    /// failure is logged as a system message and handed back unchanged.
    pub fn send<F, Fut, E>(
        &mut self,
        doc: &mut Document,
        handler: F,
    ) -> Option<impl Future<Output = Result<(), E>>>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<Option<ChatMessage>, E>>,
        E: fmt::Display,
    {
        let text = self.draft.trim().to_string();
        if text.is_empty() {
            return None;
        }

        let log = Rc::clone(&self.messages);
        let pending = self.control.invoke(move || {
            log.borrow_mut().push(ChatMessage::user(text.as_str()));
            handler(text)
        })?;

        self.set_draft(doc, "");
        self.sync(doc);

        let messages = Rc::clone(&self.messages);
        Some(async move {
            match pending.await {
                Ok(reply) => {
                    if let Some(reply) = reply {
                        messages.borrow_mut().push(reply);
                    }
                    Ok(())
                }
                Err(e) => {
                    tracing::warn!(target: "chat", "send failed: {}", e);
                    messages
                        .borrow_mut()
                        .push(ChatMessage::system(format!("Failed to send: {}", e)));
                    Err(e)
                }
            }
        })
    }

    /// Render messages not yet in the log and reflect busy state
    pub fn sync(&mut self, doc: &mut Document) {
        let messages = self.messages.borrow();
        if messages.len() < self.rendered {
            doc.clear_children(self.log);
            self.rendered = 0;
        }

        if messages.is_empty() {
            if doc.children(self.log).is_empty() {
                let empty = doc.text_element("div", &[classes::CHAT_EMPTY], self.empty_text.as_str());
                let _ = doc.append_child(self.log, empty);
            }
        } else {
            if self.rendered == 0 {
                // Drop the empty-state placeholder
                doc.clear_children(self.log);
            }
            for message in &messages[self.rendered..] {
                let node = doc.text_element(
                    "div",
                    &[classes::CHAT_MESSAGE, message.role.class()],
                    message.content.as_str(),
                );
                if let Some(meta) = &message.meta {
                    let meta = doc.text_element("span", &[classes::CHAT_META], meta.as_str());
                    let _ = doc.append_child(node, meta);
                }
                let _ = doc.append_child(self.log, node);
            }
            self.rendered = messages.len();
        }

        let busy = self.control.is_busy();
        doc.set_disabled(self.send_button, busy);
        doc.set_disabled(self.input, busy);
    }
}
