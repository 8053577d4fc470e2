use sapper_protocol::GameSize;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct NewGameProps {
    pub on_choose: Callback<GameSize>,
}

#[function_component]
pub(crate) fn NewGameChooser(props: &NewGameProps) -> Html {
    html! {
        <div class="newGame">
            <div>{"New Game"}</div>
            <div>
                {
                    for GameSize::ALL.into_iter().map(|size| {
                        let onclick = props.on_choose.reform(move |_: MouseEvent| size);
                        html! { <a class={size.as_str()} {onclick}>{size.label()}</a> }
                    })
                }
            </div>
        </div>
    }
}
