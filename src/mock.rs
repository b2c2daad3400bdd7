//! Canned replies used when no upstream credential is configured or the
//! upstream call fails.
//!
//! Routing is a fixed, ordered list of keyword predicates over the lowercased
//! message; the first match wins. Topics with several variants pick one with
//! the injected `fastrand::Rng`.

use crate::types::UserLocation;
use lazy_static::lazy_static;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockTopic {
    JobRedirect,
    Greeting,
    About,
    BridviaConnect,
    Audience,
    HowItWorks,
    Benefits,
    Companies,
    Availability,
    Pricing,
    Contact,
    Skills,
    Future,
    Mentorship,
    General,
}

lazy_static! {
    static ref GREETING_WORD: Regex = Regex::new(r"\b(?:hello|hi)\b").expect("Invalid greeting regex");
    static ref GREETING_OPENER: Regex =
        Regex::new(r"^(?:hey|what's up|good morning|good afternoon)\b").expect("Invalid greeting opener regex");
}

fn contains_any(message: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| message.contains(n))
}

fn is_job(m: &str) -> bool {
    contains_any(m, &["job", "employment", "hire", "position", "career opportunities"])
}

fn is_greeting(m: &str) -> bool {
    GREETING_WORD.is_match(m) || GREETING_OPENER.is_match(m)
}

fn is_about(m: &str) -> bool {
    contains_any(m, &["what is bridvia", "about bridvia", "tell me about"])
}

fn is_bridvia_connect(m: &str) -> bool {
    contains_any(m, &["bridviaconnect", "phase 1", "internship"])
}

fn is_audience(m: &str) -> bool {
    m.contains("who") && contains_any(m, &["can use", "is this for", "target"])
}

fn is_how_it_works(m: &str) -> bool {
    m.contains("how") && contains_any(m, &["work", "does it", "process"])
}

fn is_benefits(m: &str) -> bool {
    contains_any(m, &["benefit", "advantage", "why choose", "what makes"])
}

fn is_companies(m: &str) -> bool {
    contains_any(m, &["company", "companies", "partner", "employer"])
}

fn is_availability(m: &str) -> bool {
    contains_any(
        m,
        &["available", "opportunities", "current", "now", "apply", "start", "when"],
    )
}

fn is_pricing(m: &str) -> bool {
    contains_any(m, &["cost", "price", "fee", "pay", "money"])
}

fn is_contact(m: &str) -> bool {
    contains_any(
        m,
        &["contact", "reach", "email", "get in touch", "more information"],
    )
}

fn is_skills(m: &str) -> bool {
    contains_any(m, &["skill", "experience", "learn", "develop", "training"])
}

fn is_future(m: &str) -> bool {
    contains_any(m, &["future", "next", "phase 2", "what's next", "roadmap"])
}

fn is_mentorship(m: &str) -> bool {
    contains_any(m, &["mentor", "support", "guidance", "help"])
}

/// Priority order. Reordering changes which reply wins for overlapping
/// keywords (e.g. "job" beats "internship").
const ROUTES: &[(MockTopic, fn(&str) -> bool)] = &[
    (MockTopic::JobRedirect, is_job),
    (MockTopic::Greeting, is_greeting),
    (MockTopic::About, is_about),
    (MockTopic::BridviaConnect, is_bridvia_connect),
    (MockTopic::Audience, is_audience),
    (MockTopic::HowItWorks, is_how_it_works),
    (MockTopic::Benefits, is_benefits),
    (MockTopic::Companies, is_companies),
    (MockTopic::Availability, is_availability),
    (MockTopic::Pricing, is_pricing),
    (MockTopic::Contact, is_contact),
    (MockTopic::Skills, is_skills),
    (MockTopic::Future, is_future),
    (MockTopic::Mentorship, is_mentorship),
];

pub fn classify(message: &str) -> MockTopic {
    let lower = message.to_lowercase();
    ROUTES
        .iter()
        .find(|(_, matches)| matches(&lower))
        .map(|(topic, _)| *topic)
        .unwrap_or(MockTopic::General)
}

const JOB_REDIRECT: &[&str] = &["I appreciate your interest! I want to be crystal clear about what Bridvia offers: we specialize exclusively in **internship opportunities**, not job placements or full-time employment connections. Our mission is to prepare individuals for future career success through comprehensive, structured **internship experiences**. These **internships** provide the hands-on experience, professional skills, and industry connections that make you highly attractive to future employers. Think of us as your stepping stone to career readiness - we focus on building your foundation through meaningful **internship programs** so you'll be well-prepared when you do pursue full-time positions elsewhere. Our goal is helping you become the candidate that employers want to hire through the skills and experience gained during your **internship journey** with us!"];

const GREETINGS: &[&str] = &[
    "Hello! I'm Brid AI, and I'm thrilled you're here exploring Bridvia. We're building something really exciting - infrastructure that connects talented people like you with meaningful opportunities. What brings you here today?",
    "Hi there! I'm Brid AI, your guide to understanding how Bridvia is transforming career development. We're passionate about bridging the gap between education and industry readiness. How can I help you explore what we're building?",
    "Hey! Great to meet you. I'm Brid AI, and I love talking about Bridvia's mission to connect talent with opportunity through hands-on experiences. What would you like to know about our platform?",
];

const ABOUT: &[&str] = &["Bridvia is on a mission to reshape how people develop their careers through **internship opportunities**! We're building infrastructure that connects talent with opportunity, specifically addressing that frustrating gap between education and what the industry actually needs. Think of us as career development revolutionaries - we believe that hands-on, practical experience through structured **internships** is the key to unlocking someone's potential. Our vision is to create pathways where learning happens through real work during internships, mentorship comes from industry pros, and every internship experience builds toward sustainable career growth. It's about empowering the next generation with the tools and experiences they need to thrive in tomorrow's workplace. **Important note**: We specialize exclusively in internship opportunities, not job placements - our focus is on preparing you for future career success through comprehensive internship experiences."];

const CONNECT_ON_CONNECT_PAGE: &[&str] = &["BridviaConnect is where our vision comes to life! It's Phase 1 of our ecosystem, and honestly, I'm excited about what we're building here. We're creating structured **internship experiences** that aren't just 'fetch coffee' roles - these are meaningful **internship programs** with clear learning objectives, real projects, and mentorship from professionals who genuinely want to see you succeed. The idea is to bridge that gap between classroom theory and workplace reality through hands-on **internships**. Every **internship opportunity** is carefully curated to ensure you're gaining skills that actually matter in today's job market while building relationships that can shape your career. It's practical career development at its finest! **Important**: We focus exclusively on **internship placements** to prepare you for future employment success, not direct job placements."];

const CONNECT_ON_MAIN_PAGE: &[&str] = &["BridviaConnect represents Phase 1 of our vision - and it's pretty exciting! We're focused on creating structured **internship opportunities** that go way beyond traditional programs. Think meaningful projects, dedicated mentorship, and real skill development with companies who are genuinely invested in your growth through **internships**. It's designed for anyone looking to bridge the gap between education and industry readiness - whether you're a recent graduate, career switcher, or professional exploring new areas through **internship experiences**. The goal is to give you hands-on experience through **internships** that actually prepares you for what employers are looking for. **Note**: We specialize in **internship programs**, not job placements - our mission is building your readiness for future career success."];

const AUDIENCE: &[&str] = &["Bridvia is designed for anyone looking to bridge the gap between where they are and where they want to be in their career through **internship experiences**! This includes recent graduates who have the knowledge but need practical experience through **internships**, career switchers who want to transition industries with confidence via **internship programs**, professionals looking to gain experience in new areas or technologies through specialized **internships**, and certification completers who want to apply what they've learned in real-world **internship settings**. We also work with companies of all sizes who are committed to meaningful talent development through **internship partnerships**. Really, if you're someone who believes in learning through doing and wants to build a career foundation through hands-on **internship experience**, Bridvia is for you. **Important**: We focus on **internship opportunities** to build your skills for future career success, not direct job placements."];

const HOW_IT_WORKS: &[&str] = &["Our approach is refreshingly straightforward! We focus on creating structured pathways where learning happens through real work. The process involves getting matched with opportunities that align with your goals and interests, engaging in structured programs with clear learning objectives, and receiving mentorship from industry professionals who are invested in your growth. Every experience is designed to build your skills, expand your network, and prepare you for what employers actually want. It's about practical career development - learning by doing, growing through real challenges, and building a portfolio of experiences that speak volumes about your capabilities."];

const BENEFITS: &[&str] = &["What makes Bridvia special is our focus on **meaningful internship experiences** that build your career foundation. You're not just gaining experience - you're building readiness for long-term success through structured **internship programs**. The benefits include practical work experience with real projects and industry-standard tools during **internships**, professional mentorship from people who genuinely care about your growth throughout your **internship journey**, increased employability through portfolio building and skill development via **internship projects**, career clarity through real-world application and feedback in **internship settings**, and access to professional networks that can open doors throughout your career after completing **internships** with us. But beyond the practical benefits, it's about confidence - knowing that you have the hands-on experience and skills that employers value, gained through comprehensive **internship experiences** that prepare you for whatever career path you choose to pursue next."];

const COMPANIES: &[&str] = &["We're building partnerships with companies who share our vision for meaningful talent development! These aren't just any companies - we're looking for organizations that are genuinely committed to providing structured learning experiences with real mentorship and growth opportunities. We work with companies of all sizes, from innovative startups to established enterprises, all united by a common goal: creating opportunities where both talent and businesses can thrive. For companies, it's about accessing motivated talent while building their reputation as industry contributors and developing long-term talent pipelines. We're currently in an exciting development phase, carefully curating these partnerships to ensure quality and impact."];

const AVAILABILITY: &[&str] = &["I love your enthusiasm to get started! We're currently in an exciting development phase, carefully curating partnerships and opportunities to ensure they meet our high standards for meaningful career development. Our team is working diligently to build something truly impactful - quality over speed is our motto. We're focused on creating experiences that will genuinely transform careers, not just fill positions. For the latest updates on available programs and to discuss how Bridvia can support your specific career goals, I'd encourage you to connect with our team at info@bridvia.com. They're passionate about helping people like you find the right opportunities and would love to hear about your aspirations!"];

const PRICING: &[&str] = &["Great question! We're currently in the development phase, and our focus is on creating programs that provide incredible value for career development. The investment structure will depend on the specific programs and partnerships we finalize. What I can tell you is that we're committed to making our programs accessible and ensuring that the value you receive far exceeds any investment. For detailed information about program structure and any associated costs, our team at info@bridvia.com would be the best people to discuss your specific situation and goals."];

const CONTACT: &[&str] = &["I'd love to connect you with our team! You can reach out to info@bridvia.com - and honestly, these are people who are genuinely passionate about career development and helping people like you succeed. They're not just there to answer questions; they're there to understand your goals, discuss how Bridvia can support your career journey, and provide insights that can help regardless of where you are in your professional development. Don't hesitate to reach out - they love hearing from people who are excited about building their careers through practical experience!"];

const SKILLS: &[&str] = &["Skills development is at the heart of everything we do! Our approach focuses on building both technical and soft skills through real-world application. You'll work with industry-standard tools and technologies, tackle actual business challenges, and learn from professionals who are using these skills every day. But it's not just about technical abilities - we emphasize communication, problem-solving, project management, and all those crucial soft skills that make someone truly valuable in the workplace. The goal is to develop a well-rounded skill set that prepares you for the demands of tomorrow's workplace, not just today's job requirements."];

const FUTURE: &[&str] = &["The future of Bridvia is incredibly exciting! While BridviaConnect represents our Phase 1 focus on internship opportunities, we're building toward a comprehensive ecosystem for career development. Think of it as evolving beyond just connecting people with opportunities to creating an entire infrastructure that supports lifelong professional growth. While I can't share all the details (some things are still being finalized!), I can tell you that our vision extends far beyond traditional career platforms. We're building something that will fundamentally change how people approach their professional development. The possibilities are really exciting!"];

const MENTORSHIP: &[&str] = &["Mentorship is one of the things I'm most excited about in our approach! We believe that having the right guidance can completely transform someone's career trajectory. Our mentorship isn't just occasional check-ins - it's structured, ongoing support from industry professionals who are genuinely invested in your success. These are people who remember what it's like to be where you are and want to help you navigate the challenges and opportunities ahead. The mentorship component ensures you're not just gaining experience, but you're gaining insights, making connections, and developing the professional judgment that comes from working alongside experienced practitioners."];

const GENERAL: &[&str] = &[
    "That's a great question! Bridvia is all about connecting talented people with meaningful opportunities through hands-on experience. We're building infrastructure that bridges the gap between education and industry readiness, focusing on practical career development that actually prepares you for success. I'd love to dive deeper into any specific aspect that interests you, or if you'd like to explore how Bridvia might fit into your career journey, our team at info@bridvia.com would be thrilled to chat with you!",
    "I appreciate you asking! We're passionate about transforming how people develop their careers through practical, hands-on experiences. Bridvia focuses on creating structured opportunities where learning happens through real work, mentorship comes from industry professionals, and every experience builds toward your long-term career goals. What specific aspect of career development or our platform would you like to explore further?",
    "Thanks for your interest in Bridvia! We're building something really special - a platform that connects talent with opportunity in meaningful ways. Our focus is on practical career development through structured programs, professional mentorship, and real-world experience that actually prepares you for industry demands. Is there a particular area of our platform or approach you'd like to know more about?",
];

/// Every reply a topic can produce for a location.
pub fn candidates(topic: MockTopic, location: UserLocation) -> &'static [&'static str] {
    match topic {
        MockTopic::JobRedirect => JOB_REDIRECT,
        MockTopic::Greeting => GREETINGS,
        MockTopic::About => ABOUT,
        MockTopic::BridviaConnect => match location {
            UserLocation::BridviaConnect => CONNECT_ON_CONNECT_PAGE,
            UserLocation::Main => CONNECT_ON_MAIN_PAGE,
        },
        MockTopic::Audience => AUDIENCE,
        MockTopic::HowItWorks => HOW_IT_WORKS,
        MockTopic::Benefits => BENEFITS,
        MockTopic::Companies => COMPANIES,
        MockTopic::Availability => AVAILABILITY,
        MockTopic::Pricing => PRICING,
        MockTopic::Contact => CONTACT,
        MockTopic::Skills => SKILLS,
        MockTopic::Future => FUTURE,
        MockTopic::Mentorship => MENTORSHIP,
        MockTopic::General => GENERAL,
    }
}

pub struct MockResponder {
    rng: fastrand::Rng,
}

impl Default for MockResponder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockResponder {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn respond(&mut self, message: &str, location: UserLocation) -> String {
        let topic = classify(message);
        let options = candidates(topic, location);
        let reply = options[self.rng.usize(..options.len())];
        tracing::debug!("[🎭] Mock reply: {:?} ({} variants)", topic, options.len());
        reply.to_string()
    }
}

pub fn generate_mock(message: &str, location: UserLocation) -> String {
    MockResponder::new().respond(message, location)
}

/// Splits a reply on single spaces for simulated token delivery. Every word
/// but the last keeps its trailing space, so the pieces concatenate back to
/// `text` exactly.
pub fn mock_words(text: &str) -> Vec<String> {
    let parts: Vec<&str> = text.split(' ').collect();
    let last = parts.len().saturating_sub(1);
    parts
        .iter()
        .enumerate()
        .map(|(i, word)| {
            if i < last {
                format!("{} ", word)
            } else {
                word.to_string()
            }
        })
        .collect()
}
